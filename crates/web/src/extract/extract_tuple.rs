use crate::extract::{ArgError, Arguments, FromArg};
use uniweb_route::ArgType;

/// A tuple of handler arguments, bound slot by slot from [`Arguments`].
pub trait FromArgs: Sized {
    fn arg_types() -> Vec<ArgType>;

    fn from_args(args: Arguments) -> Result<Self, ArgError>;
}

macro_rules! impl_from_args_for_tuple ({ $($param:ident)* } => {
    impl<$($param,)*> FromArgs for ($($param,)*)
    where
        $($param: FromArg,)*
    {
        fn arg_types() -> Vec<ArgType> {
            vec![$($param::arg_type(),)*]
        }

        #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments, reason = "generated for every arity")]
        fn from_args(args: Arguments) -> Result<Self, ArgError> {
            let expected = Self::arg_types().len();
            if args.len() != expected {
                return Err(ArgError::Arity { expected, actual: args.len() });
            }

            let mut values = args.into_iter();
            let mut slot = 0;
            $(
            let $param = $param::from_arg(slot, values.next().flatten())?;
            slot += 1;
            )*
            Ok(($($param,)*))
        }
    }
});

impl_from_args_for_tuple! {}
impl_from_args_for_tuple! { A }
impl_from_args_for_tuple! { A B }
impl_from_args_for_tuple! { A B C }
impl_from_args_for_tuple! { A B C D }
impl_from_args_for_tuple! { A B C D E }
impl_from_args_for_tuple! { A B C D E F }
impl_from_args_for_tuple! { A B C D E F G }
impl_from_args_for_tuple! { A B C D E F G H }
impl_from_args_for_tuple! { A B C D E F G H I }
impl_from_args_for_tuple! { A B C D E F G H I J }
impl_from_args_for_tuple! { A B C D E F G H I J K }
impl_from_args_for_tuple! { A B C D E F G H I J K L }
