//! The `Template` type: a parsed template file plus the data bound to it.

use std::fs;
use std::path::{Path, PathBuf};

use stencil_expr::{ConstantRegistry, FunctionRegistry};
use stencil_tree::{NodeId, NodeMut, Tree, Value};

use crate::ast::BlockNode;
use crate::error::TemplateError;
use crate::parser;
use crate::renderer;

/// A parsed template and the data tree it renders against.
///
/// A template doubles as the root node of its own data tree: variables set on
/// it are visible everywhere, and each child added under a block's name
/// produces one rendering of that block.
///
/// ```
/// use stencil_template::Template;
///
/// let mut tpl = Template::from_source(
///     "<h1>{$title}</h1>{block:ad}<p>{$ad_content}</p>{end}",
/// )?;
/// tpl.set("title", "Some title");
/// for ad in ["Some ad", "Another ad"] {
///     tpl.add("ad").set("ad_content", ad);
/// }
///
/// assert_eq!(
///     tpl.render()?,
///     "<h1>Some title</h1><p>Some ad</p><p>Another ad</p>",
/// );
/// # Ok::<(), stencil_template::TemplateError>(())
/// ```
#[derive(Debug)]
pub struct Template {
    path: Option<PathBuf>,
    source: String,
    root_block: BlockNode,
    data: Tree,
    functions: FunctionRegistry,
    constants: ConstantRegistry,
}

impl Template {
    /// Parse a template from an in-memory string.
    pub fn from_source(source: impl Into<String>) -> Result<Self, TemplateError> {
        Self::build(source.into(), None)
    }

    /// Read and parse a template file directly, bypassing the include path.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let path = path.into();
        let source = fs::read_to_string(&path)?;
        Self::build(source, Some(path))
    }

    fn build(source: String, path: Option<PathBuf>) -> Result<Self, TemplateError> {
        let file = match &path {
            Some(path) => path.display().to_string(),
            None => "<source>".to_string(),
        };
        let root_block = parser::parse(&source, &file)?;

        Ok(Template {
            path,
            source,
            root_block,
            data: Tree::new("template"),
            functions: FunctionRegistry::default(),
            constants: ConstantRegistry::new(),
        })
    }

    /// The path the template was read from, if it came from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The raw template source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed block structure.
    pub fn root_block(&self) -> &BlockNode {
        &self.root_block
    }

    // --- Data scope ---

    pub fn data(&self) -> &Tree {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Tree {
        &mut self.data
    }

    /// The root node of the data tree, i.e. the template's own scope.
    pub fn root(&self) -> NodeId {
        self.data.root()
    }

    /// Set a variable on the template's root scope.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let root = self.data.root();
        self.data.set(root, name, value);
        self
    }

    /// Set several variables on the template's root scope.
    pub fn set_many<K, V, I>(&mut self, variables: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let root = self.data.root();
        self.data.set_many(root, variables);
        self
    }

    /// Scope lookup on the root scope.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(self.data.root(), name)
    }

    /// Add a data child under the root scope, typically named after a block.
    pub fn add(&mut self, name: &str) -> NodeMut<'_> {
        let root = self.data.root();
        self.data.add_mut(root, name)
    }

    /// All direct data children with the given name.
    pub fn find(&self, name: &str) -> Vec<NodeId> {
        self.data.find(self.data.root(), name)
    }

    pub fn children(&self) -> &[NodeId] {
        self.data.children(self.data.root())
    }

    // --- Registries ---

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    pub fn constants(&self) -> &ConstantRegistry {
        &self.constants
    }

    pub fn constants_mut(&mut self) -> &mut ConstantRegistry {
        &mut self.constants
    }

    /// Render the template against its data tree.
    ///
    /// Rendering walks the parse tree depth-first with the template's root
    /// scope as the initial data node; it mutates nothing, so rendering twice
    /// without touching the data tree yields identical output.
    pub fn render(&self) -> Result<String, TemplateError> {
        renderer::render_block(
            &self.root_block,
            &self.data,
            self.data.root(),
            &self.functions,
            &self.constants,
        )
    }
}
