use serde::{Deserialize, Serialize};

/// How the host type checker classified a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Primitive,
    UserComposite,

    // Capacity 0 is an unbounded sequence
    Array,
    Map,
}

/// A type as written on a declaration, already resolved by the host type checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredType {
    pub name: String,
    pub kind: TypeKind,

    #[serde(default)]
    pub capacity: u32,

    // Element type for arrays, key and value types for maps
    #[serde(default)]
    pub arguments: Vec<DeclaredType>,
}

impl DeclaredType {
    pub fn primitive(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind: TypeKind::Primitive,
            capacity: 0,
            arguments: Vec::new(),
        }
    }

    pub fn composite(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind: TypeKind::UserComposite,
            capacity: 0,
            arguments: Vec::new(),
        }
    }

    pub fn sequence(element: DeclaredType) -> Self {
        Self {
            name: String::from("Array"),
            kind: TypeKind::Array,
            capacity: 0,
            arguments: vec![element],
        }
    }

    pub fn fixed_array(element: DeclaredType, capacity: u32) -> Self {
        Self {
            name: String::from("StaticArray"),
            kind: TypeKind::Array,
            capacity,
            arguments: vec![element],
        }
    }

    pub fn map(key: DeclaredType, value: DeclaredType) -> Self {
        Self {
            name: String::from("Map"),
            kind: TypeKind::Map,
            capacity: 0,
            arguments: vec![key, value],
        }
    }

    /// Canonical key used to deduplicate type table entries.
    /// Two declared types with the same key always share one entry.
    pub fn type_key(&self) -> String {
        match self.kind {
            TypeKind::Primitive => abi_primitive_name(&self.name)
                .map(str::to_owned)
                .unwrap_or_else(|| self.name.to_owned()),

            TypeKind::UserComposite => self.name.to_owned(),

            TypeKind::Array => {
                let element = self.argument_keys();
                if self.capacity > 0 {
                    format!("StaticArray<{},{}>", element, self.capacity)
                } else {
                    format!("Array<{element}>")
                }
            }

            TypeKind::Map => format!("Map<{}>", self.argument_keys()),
        }
    }

    fn argument_keys(&self) -> String {
        self.arguments
            .iter()
            .map(DeclaredType::type_key)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Name shown to ABI consumers for parameters and event arguments
    pub fn display_name(&self) -> Vec<String> {
        vec![self.name.to_owned()]
    }

    /// `void` returns are written as a primitive by some host parsers
    pub fn is_void(&self) -> bool {
        self.kind == TypeKind::Primitive && self.name == "void"
    }
}

/// Maps a host primitive name onto its canonical ABI name
pub fn abi_primitive_name(name: &str) -> Option<&'static str> {
    let abi_name = match name {
        "bool" => "bool",
        "i8" => "i8",
        "i16" => "i16",
        "i32" | "isize" => "i32",
        "i64" => "i64",
        "i128" => "i128",
        "u8" => "u8",
        "u16" => "u16",
        "u32" | "usize" => "u32",
        "u64" => "u64",
        "u128" => "u128",
        "f32" => "f32",
        "f64" => "f64",
        "string" | "String" | "str" => "str",
        _ => return None,
    };

    Some(abi_name)
}
