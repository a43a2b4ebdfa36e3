//! Object and method table layout
//!
//! Computes where fields and methods live for every class, by prefixing
//! each class with its parent:
//!
//! - fields: parent's fields first, then the class's own; a redeclared
//!   field keeps the inherited position
//! - methods: parent's slots first; an override replaces the inherited slot,
//!   a new method is appended
//!
//! Only the parent's list is searched for a match, so a name declared twice
//! in one class takes two positions. Every hierarchy hangs off an implicit
//! empty `Object` class. The main class's `main` method gets no slot; a
//! `main` method on any other class is an ordinary method.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::abi::{field_offset, object_size, slot_offset, MAIN_METHOD, ROOT_CLASS, VTABLE_LABEL_PREFIX};

/// Error type for layout computation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Class '{0}' is declared more than once")]
    DuplicateClass(String),

    #[error("Class name '{0}' is reserved")]
    ReservedName(String),

    #[error("Class '{class}' extends unknown class '{parent}'")]
    UnknownParent { class: String, parent: String },

    #[error("Inheritance cycle: {}", .0.join(" -> "))]
    InheritanceCycle(Vec<String>),

    #[error("Main class '{0}' is not declared")]
    UnknownMainClass(String),
}

/// A class as declared in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(name.into());
        self
    }
}

/// One method table slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VtableEntry {
    /// Class that supplies the implementation
    pub owner: String,
    pub method: String,
}

impl VtableEntry {
    /// Code symbol stored in the slot (`Doit_doit`)
    pub fn symbol(&self) -> String {
        format!("{}_{}", self.owner, self.method)
    }
}

/// Resolved layout of one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassLayout {
    pub name: String,
    pub parent: Option<String>,
    fields: Vec<String>,
    vtable: Vec<VtableEntry>,
}

impl ClassLayout {
    fn root() -> Self {
        Self {
            name: ROOT_CLASS.to_string(),
            parent: None,
            fields: Vec::new(),
            vtable: Vec::new(),
        }
    }

    fn prefixed(parent: &ClassLayout, decl: &ClassDecl, is_main_class: bool) -> Self {
        let mut fields = parent.fields.clone();
        for field in &decl.fields {
            match parent.fields.iter().position(|f| f == field) {
                Some(index) => fields[index] = field.clone(),
                None => fields.push(field.clone()),
            }
        }

        let mut vtable = parent.vtable.clone();
        for method in &decl.methods {
            if is_main_class && method == MAIN_METHOD {
                continue;
            }
            let entry = VtableEntry {
                owner: decl.name.clone(),
                method: method.clone(),
            };
            match parent.vtable.iter().position(|e| &e.method == method) {
                Some(slot) => vtable[slot] = entry,
                None => vtable.push(entry),
            }
        }

        Self {
            name: decl.name.clone(),
            parent: Some(parent.name.clone()),
            fields,
            vtable,
        }
    }

    /// Object size in bytes, including the method table word
    pub fn size_bytes(&self) -> usize {
        object_size(self.fields.len())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field_offset(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field).map(field_offset)
    }

    pub fn method_offset(&self, method: &str) -> Option<usize> {
        self.vtable.iter().position(|e| e.method == method).map(slot_offset)
    }

    /// Data label of the method table (`.V_Doit`)
    pub fn vtable_symbol(&self) -> String {
        format!("{}{}", VTABLE_LABEL_PREFIX, self.name)
    }

    pub fn vtable_entries(&self) -> &[VtableEntry] {
        &self.vtable
    }
}

/// Layouts for every declared class, in declaration order
#[derive(Debug, Clone, Default)]
pub struct LayoutTable {
    classes: IndexMap<String, ClassLayout>,
    main_class: Option<String>,
}

impl LayoutTable {
    /// Lay out `decls`; `main_class` names the class whose `main` is the
    /// program entry
    pub fn build(decls: &[ClassDecl], main_class: Option<&str>) -> Result<Self, LayoutError> {
        let mut by_name: HashMap<&str, &ClassDecl> = HashMap::with_capacity(decls.len());
        for decl in decls {
            if decl.name == ROOT_CLASS {
                return Err(LayoutError::ReservedName(decl.name.clone()));
            }
            if by_name.insert(decl.name.as_str(), decl).is_some() {
                return Err(LayoutError::DuplicateClass(decl.name.clone()));
            }
        }

        if let Some(main) = main_class {
            if !by_name.contains_key(main) {
                return Err(LayoutError::UnknownMainClass(main.to_string()));
            }
        }

        let ctx = Resolver {
            by_name: &by_name,
            root: ClassLayout::root(),
            main_class,
        };
        let mut resolved: HashMap<String, ClassLayout> = HashMap::with_capacity(decls.len());
        for decl in decls {
            let mut visiting = Vec::new();
            ctx.resolve(decl, &mut resolved, &mut visiting)?;
        }

        let mut classes = IndexMap::with_capacity(decls.len());
        for decl in decls {
            if let Some(layout) = resolved.remove(&decl.name) {
                classes.insert(decl.name.clone(), layout);
            }
        }
        Ok(Self {
            classes,
            main_class: main_class.map(str::to_string),
        })
    }

    pub fn main_class(&self) -> Option<&str> {
        self.main_class.as_deref()
    }

    pub fn get(&self, class: &str) -> Option<&ClassLayout> {
        self.classes.get(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassLayout> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

struct Resolver<'a> {
    by_name: &'a HashMap<&'a str, &'a ClassDecl>,
    root: ClassLayout,
    main_class: Option<&'a str>,
}

impl Resolver<'_> {
    fn resolve(
        &self,
        decl: &ClassDecl,
        resolved: &mut HashMap<String, ClassLayout>,
        visiting: &mut Vec<String>,
    ) -> Result<(), LayoutError> {
        if resolved.contains_key(&decl.name) {
            return Ok(());
        }
        if let Some(start) = visiting.iter().position(|c| c == &decl.name) {
            let mut cycle = visiting[start..].to_vec();
            cycle.push(decl.name.clone());
            return Err(LayoutError::InheritanceCycle(cycle));
        }

        let is_main_class = self.main_class == Some(decl.name.as_str());
        let layout = match decl.extends.as_deref() {
            None | Some(ROOT_CLASS) => ClassLayout::prefixed(&self.root, decl, is_main_class),
            Some(parent_name) => {
                let parent_decl =
                    self.by_name
                        .get(parent_name)
                        .ok_or_else(|| LayoutError::UnknownParent {
                            class: decl.name.clone(),
                            parent: parent_name.to_string(),
                        })?;

                visiting.push(decl.name.clone());
                self.resolve(parent_decl, resolved, visiting)?;
                visiting.pop();

                ClassLayout::prefixed(&resolved[parent_name], decl, is_main_class)
            },
        };

        resolved.insert(decl.name.clone(), layout);
        Ok(())
    }
}
