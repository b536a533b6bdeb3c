use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Compressors the pipeline knows how to drive
///
/// Names are matched case-insensitively when read from a pipeline configuration, so
/// `"sz3"` and `"SZ3"` are the same tool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tool {
    Sz3,
    Fqzcomp,
    Spring,
    Renano,
    Enano,
    Genozip,
    Bfqzip,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Sz3,
        Tool::Fqzcomp,
        Tool::Spring,
        Tool::Renano,
        Tool::Enano,
        Tool::Genozip,
        Tool::Bfqzip,
    ];

    /// Extension appended to compressed output file names
    ///
    /// BFQZIP writes straight into the decompressed output directory and carries no
    /// suffix on its "compressed" file.
    pub fn compressed_suffix(&self) -> &'static str {
        match self {
            Tool::Sz3 => ".sz",
            Tool::Fqzcomp => ".fqz",
            Tool::Spring => ".spring",
            Tool::Renano => ".renano",
            Tool::Enano => ".enano",
            Tool::Genozip => ".genozip",
            Tool::Bfqzip => "",
        }
    }

    /// Extension appended to the compressed file name to build the decompressed one
    pub fn decompressed_suffix(&self) -> &'static str {
        match self {
            Tool::Bfqzip => ".fq",
            Tool::Sz3 => ".bin.fastq",
            _ => ".fastq",
        }
    }

    /// SZ3 works on the binary quality-score stream, so its inputs are split into
    /// FASTQ fields first and reassembled after decompression
    pub fn splits_fields(&self) -> bool {
        matches!(self, Tool::Sz3)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Sz3 => "SZ3",
            Tool::Fqzcomp => "FQZCOMP",
            Tool::Spring => "SPRING",
            Tool::Renano => "RENANO",
            Tool::Enano => "ENANO",
            Tool::Genozip => "GENOZIP",
            Tool::Bfqzip => "BFQZIP",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Tool {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name() == upper)
            .ok_or_else(|| ConfigError::UnknownTool(s.to_string()))
    }
}

impl TryFrom<String> for Tool {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tool> for String {
    fn from(tool: Tool) -> Self {
        tool.name().to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!("sz3".parse::<Tool>().unwrap(), Tool::Sz3);
        assert_eq!("FqzComp".parse::<Tool>().unwrap(), Tool::Fqzcomp);
        assert!(matches!("gzip".parse::<Tool>(), Err(ConfigError::UnknownTool(_))));
    }

    #[test]
    fn suffixes_are_distinct() {
        let mut suffixes: Vec<&str> = Tool::ALL
            .iter()
            .map(|t| t.compressed_suffix())
            .collect();
        suffixes.sort();
        suffixes.dedup();
        assert_eq!(suffixes.len(), Tool::ALL.len());
    }

    #[test]
    fn deserialise_from_json() {
        let tools: Vec<Tool> = serde_json::from_str(r#"["genozip", "Spring"]"#).unwrap();
        assert_eq!(tools, vec![Tool::Genozip, Tool::Spring]);
    }
}
