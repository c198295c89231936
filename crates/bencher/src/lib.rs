use uniweb_route::{ArgType, ReturnKind, RouteTable, Signature};

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    routes: usize,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, routes: usize) -> Self {
        Self { name, group, routes }
    }

    pub fn small(name: &'static str, routes: usize) -> Self {
        Self::new(name, TestGroup::Small, routes)
    }

    pub fn normal(name: &'static str, routes: usize) -> Self {
        Self::new(name, TestGroup::Normal, routes)
    }

    pub fn large(name: &'static str, routes: usize) -> Self {
        Self::new(name, TestGroup::Large, routes)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    /// How many generated capture routes the table holds besides the sample pages.
    pub fn routes(&self) -> usize {
        self.routes
    }

    /// Builds the sample page routes followed by `routes` generated `api/resource{i}/:id` routes
    /// and a catch-all static route, so misses scan the whole table.
    pub fn table(&self) -> RouteTable<usize> {
        let text = |name: &str, ty: ArgType| Signature::new(ReturnKind::Text).arg(name, ty);

        let mut table = RouteTable::new();
        let sample_pages = [
            ("/", Signature::new(ReturnKind::Text)),
            ("samplepage/number/:number/", text("number", ArgType::Int)),
            ("samplepage/text/:text", text("text", ArgType::String)),
            ("samplepage/path/::path", text("path", ArgType::String)),
            ("samplepage/form", text("request", ArgType::Request)),
            ("samplepage/query", text("request", ArgType::Request)),
            ("samplepage/filedownload", Signature::new(ReturnKind::Bytes).arg("response", ArgType::Response)),
        ];
        for (id, (pattern, signature)) in sample_pages.into_iter().enumerate() {
            table.register(pattern, signature, id).expect("sample page patterns are valid");
        }

        for i in 0..self.routes {
            table
                .register(&format!("api/resource{i}/:id"), text("id", ArgType::Int), table.len())
                .expect("generated patterns are valid");
        }

        table.register("static/::path", text("path", ArgType::String), table.len()).expect("static pattern is valid");
        table
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    /// The non-empty lines of the file.
    pub fn lines(&self) -> Vec<&'static str> {
        self.content.lines().map(str::trim).filter(|line| !line.is_empty()).collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
