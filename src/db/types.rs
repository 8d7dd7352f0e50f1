//! Database type definitions
//!
//! Column types as reported by the catalog, used to describe tables to the
//! language model.

/// Database data types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    // Integer types
    SmallInt,
    Integer,
    BigInt,

    // Floating point
    Real,
    Double,
    Numeric,

    // Text types
    Text,
    Varchar(Option<usize>),
    Char(Option<usize>),

    // Boolean
    Boolean,

    // Date/time types
    Date,
    Timestamp,
    TimestampTz,

    // Array type
    Array(Box<DataType>),

    // Other/unknown types
    Unknown(String),
}

impl DataType {
    /// Map `format_type()` output to a DataType.
    ///
    /// `format_type()` returns strings like "integer", "character varying(255)",
    /// "numeric(10,2)", "timestamp with time zone", "text[]", etc.
    pub fn from_format_type(type_name: &str) -> DataType {
        if let Some(inner) = type_name.strip_suffix("[]") {
            return DataType::Array(Box::new(DataType::from_format_type(inner)));
        }

        // Parameterized types: base name plus optional params
        let (base, params) = match (type_name.find('('), type_name.rfind(')')) {
            (Some(open), Some(close)) if close > open => {
                (type_name[..open].trim(), Some(&type_name[open + 1..close]))
            }
            _ => (type_name.trim(), None),
        };

        match base {
            "smallint" => DataType::SmallInt,
            "integer" => DataType::Integer,
            "bigint" => DataType::BigInt,
            "real" => DataType::Real,
            "double precision" => DataType::Double,
            "numeric" => DataType::Numeric,
            "text" | "name" => DataType::Text,
            "character varying" => DataType::Varchar(params.and_then(|p| p.parse().ok())),
            "character" => DataType::Char(params.and_then(|p| p.parse().ok())),
            "boolean" => DataType::Boolean,
            "date" => DataType::Date,
            "timestamp without time zone" => DataType::Timestamp,
            "timestamp with time zone" => DataType::TimestampTz,
            other => DataType::Unknown(other.to_string()),
        }
    }

    /// Get a human-readable display name for this type
    pub fn display_name(&self) -> String {
        match self {
            DataType::SmallInt => "smallint".to_string(),
            DataType::Integer => "integer".to_string(),
            DataType::BigInt => "bigint".to_string(),
            DataType::Real => "real".to_string(),
            DataType::Double => "double precision".to_string(),
            DataType::Numeric => "numeric".to_string(),
            DataType::Text => "text".to_string(),
            DataType::Varchar(Some(n)) => format!("varchar({})", n),
            DataType::Varchar(None) => "varchar".to_string(),
            DataType::Char(Some(n)) => format!("char({})", n),
            DataType::Char(None) => "char".to_string(),
            DataType::Boolean => "boolean".to_string(),
            DataType::Date => "date".to_string(),
            DataType::Timestamp => "timestamp".to_string(),
            DataType::TimestampTz => "timestamptz".to_string(),
            DataType::Array(inner) => format!("{}[]", inner.display_name()),
            DataType::Unknown(s) => s.clone(),
        }
    }
}
