use crate::segment::DEFAULT_PAGE;
use crate::{Param, ParamKind};

/// A value converted from a path token.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i32),
    Float(f32),
    Double(f64),
}

/// Handler argument slots filled by a successful match.
///
/// The list has one slot per handler argument. Slots that no capture bound stay `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    slots: Vec<Option<Arg>>,
}

impl Args {
    pub fn with_arity(arity: usize) -> Self {
        Self { slots: vec![None; arity] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Arg> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn set(&mut self, slot: usize, arg: Arg) {
        if let Some(target) = self.slots.get_mut(slot) {
            *target = Some(arg);
        }
    }

    pub fn into_slots(self) -> Vec<Option<Arg>> {
        self.slots
    }
}

/// Outcome of matching one token against one [`Param`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamMatch {
    Mismatch,
    /// The token matched and binds nothing.
    Matched,
    Captured(Arg),
}

/// Matches a single token.
///
/// Numeric captures reject tokens that don't convert.
pub fn match_param(token: &str, param: &Param) -> ParamMatch {
    let converted = match param.kind() {
        ParamKind::Static => return matched_if(token == param.name()),
        ParamKind::DefaultPage => return matched_if(token == DEFAULT_PAGE),
        ParamKind::String => Some(Arg::Str(token.to_owned())),
        ParamKind::Int => token.parse().ok().map(Arg::Int),
        ParamKind::Float => token.parse().ok().map(Arg::Float),
        ParamKind::Double => token.parse().ok().map(Arg::Double),
    };

    converted.map_or(ParamMatch::Mismatch, ParamMatch::Captured)
}

#[inline]
fn matched_if(condition: bool) -> ParamMatch {
    if condition { ParamMatch::Matched } else { ParamMatch::Mismatch }
}

/// Matches a compiled parameter list against the request tokens.
///
/// The token count must equal the parameter count, unless the last parameter absorbs
/// the rest of the path, in which case it may be larger. An absorbing capture binds the
/// remaining tokens joined with `/`.
pub fn match_params(params: &[Param], arity: usize, tokens: &[&str]) -> Option<Args> {
    if tokens.len() < params.len() {
        return None;
    }

    if tokens.len() > params.len() && !params.last().is_some_and(Param::absorbs_rest) {
        return None;
    }

    let mut args = Args::with_arity(arity);

    for (index, (param, token)) in params.iter().zip(tokens).enumerate() {
        match match_param(token, param) {
            ParamMatch::Mismatch => return None,
            ParamMatch::Matched => {}
            ParamMatch::Captured(_) if param.absorbs_rest() => {
                args.set(param.slot(), Arg::Str(tokens[index..].join("/")));
            }
            ParamMatch::Captured(arg) => args.set(param.slot(), arg),
        }
    }

    Some(args)
}
