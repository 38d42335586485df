//! Type registry that builds and caches one renderer per declared type.
//!
//! Types are declared as data ([`TypeDecl`]: name, direct parents, local
//! fields, optional renderer settings) and then defined once with
//! [`Registry::define`]. Defining a type:
//!
//! 1. walks the transitive closure of its parents (each ancestor once, even
//!    in a diamond),
//! 2. builds the type's pending fields from the registry's sequencer and
//!    collects the local fields of the type and every ancestor,
//! 3. merges them by field identity, so a field inherited along two paths
//!    appears once while same-named fields declared at different levels are
//!    all kept,
//! 4. builds the renderer with the resolved factory and style and stores it
//!    in the side table under the type name.
//!
//! A type's template, delimiter and factory come from its own declaration,
//! else from the nearest ancestor (breadth-first over parents in declaration
//! order) that sets them, else from the registry's [`RenderStyle`] and
//! [`FieldRendererFactory`].

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{ReprError, Result};
use crate::field::{Field, FieldBuilder};
use crate::inspect::Inspect;
use crate::renderer::{FieldRendererFactory, Render, RendererFactory};
use crate::sequencer::Sequencer;
use crate::style::RenderStyle;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// Declaration of a type: its parents, local fields and renderer settings.
///
/// Fields added through [`TypeDecl::field`] are built when the type is
/// defined and draw default priorities from the registry's sequencer, so a
/// parent's fields sort before its children's. After
/// [`TypeDecl::with_sequencer`] they are built immediately from the given
/// sequencer instead.
pub struct TypeDecl {
    name: String,
    parents: Vec<String>,
    fields: Vec<LocalField>,
    sequencer: Option<Arc<Sequencer>>,
    template: Option<String>,
    delimiter: Option<String>,
    factory: Option<Arc<dyn RendererFactory>>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            fields: Vec::new(),
            sequencer: None,
            template: None,
            delimiter: None,
            factory: None,
        }
    }

    /// Use `sequencer` for the default priorities of fields added after this
    /// call.
    pub fn with_sequencer(mut self, sequencer: Arc<Sequencer>) -> Self {
        self.sequencer = Some(sequencer);
        self
    }

    pub fn parent(mut self, name: impl Into<String>) -> Self {
        self.parents.push(name.into());
        self
    }

    pub fn parents<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add a local field.
    pub fn field(mut self, builder: FieldBuilder) -> Self {
        let local = match &self.sequencer {
            Some(sequencer) => LocalField::Built(builder.build(sequencer)),
            None => LocalField::Pending(builder),
        };
        self.fields.push(local);
        self
    }

    /// Add a local field, binding `name` unless the builder already has one.
    pub fn field_named(self, name: impl Into<String>, builder: FieldBuilder) -> Self {
        let builder = if builder.has_name() {
            builder
        } else {
            builder.name(name)
        };
        self.field(builder)
    }

    /// Add an already built field, keeping its identity.
    pub fn declared(mut self, field: Arc<Field>) -> Self {
        self.fields.push(LocalField::Built(field));
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn factory(mut self, factory: impl RendererFactory + 'static) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_names(&self) -> &[String] {
        &self.parents
    }

    /// Number of local fields, built or not.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// A local field, built now or when its type is defined.
enum LocalField {
    Built(Arc<Field>),
    Pending(FieldBuilder),
}

impl LocalField {
    fn build(self, sequencer: &Sequencer) -> Arc<Field> {
        match self {
            Self::Built(field) => field,
            Self::Pending(builder) => builder.build(sequencer),
        }
    }
}

impl fmt::Debug for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDecl")
            .field("name", &self.name)
            .field("parents", &self.parents)
            .field("field_count", &self.fields.len())
            .field("template", &self.template)
            .field("delimiter", &self.delimiter)
            .field("custom_factory", &self.factory.is_some())
            .finish()
    }
}

/// A defined type.
struct TypeEntry {
    decl: TypeDecl,
    local: Vec<Arc<Field>>,
    ancestors: Vec<String>,
    fields: Vec<Arc<Field>>,
    renderer: Arc<dyn Render>,
}

/// Side table of defined types and their renderers.
pub struct Registry {
    style: RenderStyle,
    sequencer: Sequencer,
    types: DashMap<String, Arc<TypeEntry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_style(RenderStyle::default())
    }

    pub fn with_style(style: RenderStyle) -> Self {
        Self {
            style,
            sequencer: Sequencer::default(),
            types: DashMap::new(),
        }
    }

    /// Process-wide registry with the default style.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Source of default priorities for fields declared without an explicit
    /// sequencer.
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Define a type: aggregate its fields and build its renderer.
    ///
    /// Every parent must already be defined. Defining the same name twice,
    /// or a factory that fails, is an [`ReprError::Aggregation`] and leaves
    /// the registry unchanged.
    pub fn define(&self, mut decl: TypeDecl) -> Result<Arc<dyn Render>> {
        let name = decl.name.clone();
        if self.types.contains_key(&name) {
            return Err(ReprError::aggregation(&name, "type is already defined"));
        }

        let ancestors = self.ancestor_entries(&decl)?;
        let local: Vec<Arc<Field>> = decl
            .fields
            .drain(..)
            .map(|field| field.build(&self.sequencer))
            .collect();
        let fields = merge_fields(&local, &ancestors);

        let lineage: Vec<&TypeDecl> = std::iter::once(&decl)
            .chain(ancestors.iter().map(|e| &e.decl))
            .collect();
        let style = RenderStyle {
            template: lineage
                .iter()
                .find_map(|d| d.template.clone())
                .unwrap_or_else(|| self.style.template.clone()),
            delimiter: lineage
                .iter()
                .find_map(|d| d.delimiter.clone())
                .unwrap_or_else(|| self.style.delimiter.clone()),
        };
        let factory: Arc<dyn RendererFactory> = lineage
            .iter()
            .find_map(|d| d.factory.clone())
            .unwrap_or_else(|| Arc::new(FieldRendererFactory) as Arc<dyn RendererFactory>);

        let renderer = factory
            .build(fields.clone(), &style)
            .map_err(|e| ReprError::aggregation(&name, format!("renderer factory failed: {e}")))?;

        debug!(
            type_name = %name,
            ancestors = ancestors.len(),
            local_fields = local.len(),
            fields = fields.len(),
            "type defined"
        );

        let entry = Arc::new(TypeEntry {
            ancestors: ancestors.iter().map(|e| e.decl.name.clone()).collect(),
            decl,
            local,
            fields,
            renderer: Arc::clone(&renderer),
        });

        match self.types.entry(name) {
            Entry::Occupied(occupied) => Err(ReprError::aggregation(
                occupied.key(),
                "type is already defined",
            )),
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                Ok(renderer)
            }
        }
    }

    /// Breadth-first closure over direct parents, each ancestor once.
    fn ancestor_entries(&self, decl: &TypeDecl) -> Result<Vec<Arc<TypeEntry>>> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<String> = decl.parents.iter().cloned().collect();
        let mut entries = Vec::new();

        while let Some(parent) = queue.pop_front() {
            if !seen.insert(parent.clone()) {
                continue;
            }
            let entry = self.lookup(&parent).ok_or_else(|| {
                ReprError::aggregation(&decl.name, format!("unknown parent type '{parent}'"))
            })?;
            queue.extend(entry.decl.parents.iter().cloned());
            entries.push(entry);
        }

        Ok(entries)
    }

    fn lookup(&self, name: &str) -> Option<Arc<TypeEntry>> {
        self.types.get(name).map(|entry| Arc::clone(entry.value()))
    }

    fn entry(&self, name: &str) -> Result<Arc<TypeEntry>> {
        self.lookup(name)
            .ok_or_else(|| ReprError::aggregation(name, "type is not defined"))
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Cached renderer of a defined type.
    pub fn renderer(&self, name: &str) -> Result<Arc<dyn Render>> {
        Ok(Arc::clone(&self.entry(name)?.renderer))
    }

    /// Fields declared directly on a defined type.
    pub fn local_fields(&self, name: &str) -> Result<Vec<Arc<Field>>> {
        Ok(self.entry(name)?.local.clone())
    }

    /// Local and inherited fields of a defined type, merged by identity.
    pub fn effective_fields(&self, name: &str) -> Result<Vec<Arc<Field>>> {
        Ok(self.entry(name)?.fields.clone())
    }

    /// Every ancestor of a defined type, nearest first.
    pub fn ancestors(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.entry(name)?.ancestors.clone())
    }

    /// Render `target` with the renderer registered for its type name.
    pub fn render(&self, target: &dyn Inspect) -> Result<String> {
        self.renderer(target.type_name())?.render(target)
    }

    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// The type's own fields followed by each ancestor's, first identity wins.
fn merge_fields(local: &[Arc<Field>], ancestors: &[Arc<TypeEntry>]) -> Vec<Arc<Field>> {
    let mut seen = HashSet::new();
    std::iter::once(local)
        .chain(ancestors.iter().map(|entry| entry.local.as_slice()))
        .flatten()
        .filter(|field| seen.insert(field.id()))
        .cloned()
        .collect()
}
