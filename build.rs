// fwconf - Build Script
//
// Generates the configuration schema table, record structs and defaults
// from config_schema.json before compilation.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde_json::Value;

#[path = "build/literal.rs"]
mod literal;

const SCHEMA_FILE: &str = "config_schema.json";

#[derive(Clone, Copy, PartialEq)]
enum Kind {
    Int,
    UnsignedInt,
    Double,
    Bool,
    Str,
    Object,
}

impl Kind {
    fn parse(tag: &str, path: &str) -> Kind {
        match tag {
            "i" => Kind::Int,
            "ui" => Kind::UnsignedInt,
            "d" => Kind::Double,
            "b" => Kind::Bool,
            "s" => Kind::Str,
            "o" => Kind::Object,
            other => panic!("{}: unknown type '{}' for [{}]", SCHEMA_FILE, other, path),
        }
    }

    fn conf_type(self) -> &'static str {
        match self {
            Kind::Int => "ConfType::Int",
            Kind::UnsignedInt => "ConfType::UnsignedInt",
            Kind::Double => "ConfType::Double",
            Kind::Bool => "ConfType::Bool",
            Kind::Str => "ConfType::String",
            Kind::Object => "ConfType::Object",
        }
    }

    fn rust_type(self) -> &'static str {
        match self {
            Kind::Int => "i32",
            Kind::UnsignedInt => "u32",
            Kind::Double => "f64",
            Kind::Bool => "bool",
            Kind::Str => "ConfStr",
            Kind::Object => unreachable!(),
        }
    }

    fn slot_variant(self) -> &'static str {
        match self {
            Kind::Int => "Int",
            Kind::UnsignedInt => "UnsignedInt",
            Kind::Double => "Double",
            Kind::Bool => "Bool",
            Kind::Str => "Str",
            Kind::Object => unreachable!(),
        }
    }
}

struct Node {
    key: String,
    path: String,
    kind: Kind,
    default: Value,
    title: Option<String>,
    offset: usize,
    num_desc: usize,
    children: Vec<Node>,
}

impl Node {
    fn new(key: &str, path: &str, kind: Kind, default: Value, title: Option<String>) -> Self {
        Self {
            key: key.to_string(),
            path: path.to_string(),
            kind,
            default,
            title,
            offset: 0,
            num_desc: 0,
            children: Vec::new(),
        }
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut Node> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(path))
    }

    /// Assign pre-order offsets, return the next free offset.
    fn layout(&mut self, offset: usize) -> usize {
        self.offset = offset;
        let mut next = offset + 1;
        for child in &mut self.children {
            next = child.layout(next);
        }
        self.num_desc = next - offset - 1;
        next
    }

    fn struct_name(&self) -> String {
        let mut name = String::from("Config");
        for part in self.path.split(|c| c == '.' || c == '_') {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                name.extend(first.to_uppercase());
                name.push_str(chars.as_str());
            }
        }
        name
    }

    fn field_name(&self) -> String {
        const KEYWORDS: &[&str] = &[
            "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false",
            "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
            "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe",
            "use", "where", "while", "async", "await", "dyn", "box", "yield",
        ];
        if KEYWORDS.contains(&self.key.as_str()) {
            format!("r#{}", self.key)
        } else {
            self.key.clone()
        }
    }
}

fn load_schema(manifest_dir: &Path) -> Node {
    let text = fs::read_to_string(manifest_dir.join(SCHEMA_FILE))
        .unwrap_or_else(|e| panic!("cannot read {}: {}", SCHEMA_FILE, e));
    let items: Vec<Value> =
        serde_json::from_str(&text).unwrap_or_else(|e| panic!("{}: {}", SCHEMA_FILE, e));

    let mut root = Node::new("", "", Kind::Object, Value::Null, None);

    for item in &items {
        let parts = item
            .as_array()
            .unwrap_or_else(|| panic!("{}: every entry must be an array", SCHEMA_FILE));
        let path = parts
            .first()
            .and_then(Value::as_str)
            .unwrap_or_else(|| panic!("{}: entry without a path", SCHEMA_FILE));
        let tag = parts
            .get(1)
            .and_then(Value::as_str)
            .unwrap_or_else(|| panic!("{}: [{}] has no type", SCHEMA_FILE, path));
        let kind = Kind::parse(tag, path);

        // [path, type, default?, meta?]
        let mut default = Value::Null;
        let mut title = None;
        for extra in &parts[2..] {
            match extra {
                Value::Object(meta) => {
                    title = meta.get("title").and_then(Value::as_str).map(str::to_string);
                }
                other => default = other.clone(),
            }
        }

        let (parent_path, key) = match path.rfind('.') {
            Some(i) => (&path[..i], &path[i + 1..]),
            None => ("", path),
        };
        let parent = root
            .find_mut(parent_path)
            .unwrap_or_else(|| panic!("{}: [{}] declared before its parent", SCHEMA_FILE, path));
        if parent.kind != Kind::Object {
            panic!("{}: parent of [{}] is not an object", SCHEMA_FILE, path);
        }
        if parent.children.iter().any(|c| c.key == key) {
            panic!("{}: duplicate key [{}]", SCHEMA_FILE, path);
        }
        parent.children.push(Node::new(key, path, kind, default, title));
    }

    root.layout(0);
    root
}

fn emit_entries(node: &Node, out: &mut String) {
    let _ = writeln!(
        out,
        "    ConfEntry {{ key: {:?}, conf_type: {}, offset: {}, num_desc: {} }},",
        node.key,
        node.kind.conf_type(),
        node.offset,
        node.num_desc
    );
    for child in &node.children {
        emit_entries(child, out);
    }
}

fn emit_structs(node: &Node, out: &mut String) {
    let name = node.struct_name();
    let base = node.offset;

    match &node.title {
        Some(title) => {
            let _ = writeln!(out, "#[doc = {:?}]", title);
        }
        None => {
            let _ = writeln!(out, "/// Device configuration root.");
        }
    }
    let _ = writeln!(out, "#[derive(Debug, Default, PartialEq)]");
    let _ = writeln!(out, "pub struct {} {{", name);
    for child in &node.children {
        if let Some(title) = &child.title {
            let _ = writeln!(out, "    #[doc = {:?}]", title);
        }
        let ty = match child.kind {
            Kind::Object => child.struct_name(),
            kind => kind.rust_type().to_string(),
        };
        let _ = writeln!(out, "    pub {}: {},", child.field_name(), ty);
    }
    let _ = writeln!(out, "}}\n");

    // Record: slot offsets relative to this object's own entry.
    let _ = writeln!(out, "impl Record for {} {{", name);
    for mutable in [false, true] {
        if mutable {
            let _ = writeln!(
                out,
                "    fn slot_mut(&mut self, offset: usize) -> Option<SlotMut<'_>> {{"
            );
        } else {
            let _ = writeln!(out, "    fn slot(&self, offset: usize) -> Option<Slot<'_>> {{");
        }
        let _ = writeln!(out, "        match offset {{");
        for child in &node.children {
            let rel = child.offset - base;
            let field = child.field_name();
            match child.kind {
                Kind::Object => {
                    if child.num_desc == 0 {
                        continue;
                    }
                    let method = if mutable { "slot_mut" } else { "slot" };
                    let _ = writeln!(
                        out,
                        "            n @ {}..={} => self.{}.{}(n - {}),",
                        rel + 1,
                        rel + child.num_desc,
                        field,
                        method,
                        rel
                    );
                }
                Kind::Str => {
                    let borrow = if mutable { "&mut " } else { "&" };
                    let variant = if mutable { "SlotMut" } else { "Slot" };
                    let _ = writeln!(
                        out,
                        "            {} => Some({}::Str({}self.{})),",
                        rel, variant, borrow, field
                    );
                }
                kind => {
                    let (variant, borrow) =
                        if mutable { ("SlotMut", "&mut ") } else { ("Slot", "") };
                    let _ = writeln!(
                        out,
                        "            {} => Some({}::{}({}self.{})),",
                        rel,
                        variant,
                        kind.slot_variant(),
                        borrow,
                        field
                    );
                }
            }
        }
        let _ = writeln!(out, "            _ => None,");
        let _ = writeln!(out, "        }}");
        let _ = writeln!(out, "    }}");
    }
    let _ = writeln!(out, "}}\n");

    let defaults_expr = if node.path.is_empty() {
        "&CONFIG_DEFAULTS".to_string()
    } else {
        let fields: Vec<String> = node
            .path
            .split('.')
            .map(|k| Node::new(k, k, Kind::Object, Value::Null, None).field_name())
            .collect();
        format!("&CONFIG_DEFAULTS.{}", fields.join("."))
    };
    let _ = writeln!(out, "impl SchemaRecord for {} {{", name);
    let _ = writeln!(out, "    fn schema() -> Schema<'static> {{");
    let _ = writeln!(
        out,
        "        Schema::new(&CONFIG_SCHEMA_ENTRIES[{}..{}])",
        node.offset,
        node.offset + node.num_desc + 1
    );
    let _ = writeln!(out, "    }}\n");
    let _ = writeln!(out, "    fn defaults() -> &'static Self {{");
    let _ = writeln!(out, "        {}", defaults_expr);
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}\n");

    for child in &node.children {
        if child.kind == Kind::Object {
            emit_structs(child, out);
        }
    }
}

fn default_literal(node: &Node) -> String {
    let v = &node.default;
    let literal = match node.kind {
        Kind::Int => literal::int_literal(v),
        Kind::UnsignedInt => literal::unsigned_literal(v),
        Kind::Double => literal::double_literal(v),
        Kind::Bool => literal::bool_literal(v),
        Kind::Str => literal::str_literal(v),
        Kind::Object => {
            let fields: Vec<String> = node
                .children
                .iter()
                .map(|c| format!("{}: {}", c.field_name(), default_literal(c)))
                .collect();
            return format!("{} {{ {} }}", node.struct_name(), fields.join(", "));
        }
    };
    literal.unwrap_or_else(|e| panic!("{}: [{}] {}", SCHEMA_FILE, node.path, e))
}

fn main() {
    // ESP-IDF environment setup (MUST be first!)
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");

    let root = load_schema(Path::new(&manifest_dir));

    let mut out = String::new();
    let _ = writeln!(out, "// @generated by build.rs from {}. Do not edit.\n", SCHEMA_FILE);
    let _ = writeln!(out, "/// Number of entries in [`CONFIG_SCHEMA_ENTRIES`].");
    let _ = writeln!(out, "pub const CONFIG_SCHEMA_LEN: usize = {};\n", root.num_desc + 1);
    let _ = writeln!(out, "/// Flat pre-order schema table of the device configuration.");
    let _ = writeln!(
        out,
        "pub static CONFIG_SCHEMA_ENTRIES: [ConfEntry; CONFIG_SCHEMA_LEN] = ["
    );
    emit_entries(&root, &mut out);
    let _ = writeln!(out, "];\n");

    let _ = writeln!(out, "/// Compiled-in defaults. Strings alias static text.");
    let _ = writeln!(out, "pub static CONFIG_DEFAULTS: Config = {};\n", default_literal(&root));

    emit_structs(&root, &mut out);
    let _ = writeln!(out, "impl RootRecord for Config {{}}");

    fs::write(Path::new(&out_dir).join("config.rs"), out)
        .expect("Failed to write generated config.rs");

    // Rebuild if the schema changes
    println!("cargo:rerun-if-changed={}", SCHEMA_FILE);
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=build/literal.rs");
}
