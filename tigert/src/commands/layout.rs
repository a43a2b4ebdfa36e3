//! Layout command implementation.
//!
//! Reads a TOML class description and prints object sizes, field offsets
//! and method table slots as the code generator lays them out.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tiger_rt::{ClassDecl, ClassLayout, LayoutTable};

use crate::error::{Result, TigertError};

/// Arguments for the layout command.
#[derive(Debug, Clone)]
pub struct LayoutArgs {
    pub input: PathBuf,
    pub json: bool,
}

/// Contents of a class description file
#[derive(Debug, Deserialize)]
pub struct ClassFile {
    /// Class whose `main` method is the program entry
    #[serde(default)]
    pub main_class: Option<String>,
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassDecl>,
}

impl ClassFile {
    pub fn layout(&self) -> Result<LayoutTable> {
        Ok(LayoutTable::build(&self.classes, self.main_class.as_deref())?)
    }
}

#[derive(Debug, Serialize)]
struct FieldReport<'a> {
    name: &'a str,
    offset: usize,
}

#[derive(Debug, Serialize)]
struct MethodReport {
    name: String,
    offset: usize,
    symbol: String,
}

#[derive(Debug, Serialize)]
struct ClassReport<'a> {
    name: &'a str,
    parent: Option<&'a str>,
    size: usize,
    vtable: String,
    fields: Vec<FieldReport<'a>>,
    methods: Vec<MethodReport>,
}

impl<'a> ClassReport<'a> {
    fn new(layout: &'a ClassLayout) -> Self {
        let fields = layout
            .fields()
            .iter()
            .enumerate()
            .map(|(i, name)| FieldReport {
                name,
                offset: tiger_rt::abi::field_offset(i),
            })
            .collect();
        let methods = layout
            .vtable_entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| MethodReport {
                name: entry.method.clone(),
                offset: tiger_rt::abi::slot_offset(i),
                symbol: entry.symbol(),
            })
            .collect();

        Self {
            name: &layout.name,
            parent: layout.parent.as_deref(),
            size: layout.size_bytes(),
            vtable: layout.vtable_symbol(),
            fields,
            methods,
        }
    }
}

/// Parse a class description file.
pub fn load_class_file(path: &Path) -> Result<ClassFile> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        TigertError::Validation(format!("Invalid class file {}: {}", path.display(), e))
    })
}

/// Human-readable layout listing.
pub fn render_text(table: &LayoutTable) -> String {
    let mut out = String::new();
    for layout in table.iter() {
        let report = ClassReport::new(layout);
        out.push_str(&format!(
            "class {} extends {} (size {}, vtable {})\n",
            report.name,
            report.parent.unwrap_or("-"),
            report.size,
            report.vtable
        ));
        for field in &report.fields {
            out.push_str(&format!("  field  +{:<4} {}\n", field.offset, field.name));
        }
        for method in &report.methods {
            out.push_str(&format!(
                "  method +{:<4} {} -> {}\n",
                method.offset, method.name, method.symbol
            ));
        }
    }
    out
}

pub fn render_json(table: &LayoutTable) -> Result<String> {
    let reports: Vec<ClassReport> = table.iter().map(ClassReport::new).collect();
    Ok(serde_json::to_string_pretty(&reports)?)
}

pub fn run_layout(args: LayoutArgs) -> Result<()> {
    let table = load_class_file(&args.input)?.layout()?;

    let rendered = if args.json {
        render_json(&table)?
    } else {
        render_text(&table)
    };
    print!("{}", rendered);
    if args.json {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CLASSES: &str = r#"
main_class = "Main"

[[class]]
name = "Main"
methods = ["main"]

[[class]]
name = "Shape"
fields = ["x"]
methods = ["area", "main"]

[[class]]
name = "Square"
extends = "Shape"
fields = ["side"]
methods = ["area", "grow"]
"#;

    fn table() -> LayoutTable {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("classes.toml");
        std::fs::write(&path, CLASSES).unwrap();
        load_class_file(&path).unwrap().layout().unwrap()
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&table());
        let expected = "\
class Main extends Object (size 8, vtable .V_Main)
class Shape extends Object (size 16, vtable .V_Shape)
  field  +8    x
  method +0    area -> Shape_area
  method +8    main -> Shape_main
class Square extends Shape (size 24, vtable .V_Square)
  field  +8    x
  field  +16   side
  method +0    area -> Square_area
  method +8    main -> Shape_main
  method +16   grow -> Square_grow
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&table()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[2]["name"], "Square");
        assert_eq!(value[2]["size"], 24);
        assert_eq!(value[2]["methods"][2]["symbol"], "Square_grow");
        assert_eq!(value[0]["parent"], "Object");
        assert_eq!(value[0]["methods"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_invalid_class_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[[class]]\nfields = [\"x\"]\n").unwrap();

        let err = load_class_file(&path).unwrap_err();
        assert!(matches!(err, TigertError::Validation(_)));
    }

    #[test]
    fn test_undeclared_main_class() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("classes.toml");
        std::fs::write(&path, "main_class = \"Main\"\n\n[[class]]\nname = \"A\"\n").unwrap();

        let err = load_class_file(&path).unwrap().layout().unwrap_err();
        assert!(matches!(err, TigertError::Layout(_)));
    }
}
