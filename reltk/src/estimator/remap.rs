use indexmap::IndexMap;

use crate::error::Error;

/// Longest identifier the estimator accepts
pub const MAX_PLACEHOLDER_LEN: usize = 20;

/// Run-scoped mapping between sample labels and numeric placeholders.
///
/// The sample at position `i` gets the placeholder `i + 1`, so placeholders are
/// always unique, short and free of whitespace or path separators regardless of
/// what the original labels contain.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderMap {
    to_placeholder: IndexMap<String, String>,
}

impl PlaceholderMap {
    pub fn new(labels: &[String]) -> Result<Self, Error> {
        if labels.is_empty() {
            return Err(Error::Configuration(String::from(
                "at least one sample is required",
            )));
        }

        let mut to_placeholder = IndexMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if to_placeholder
                .insert(label.clone(), (i + 1).to_string())
                .is_some()
            {
                return Err(Error::Configuration(format!(
                    "sample label {label:?} is not unique"
                )));
            }
        }

        tracing::debug!("Assigned placeholders 1..={} to samples", labels.len());

        Ok(Self { to_placeholder })
    }

    pub fn len(&self) -> usize {
        self.to_placeholder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_placeholder.is_empty()
    }

    pub fn placeholder(&self, label: &str) -> Option<&str> {
        self.to_placeholder.get(label).map(String::as_str)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.to_placeholder.values().map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.to_placeholder.keys().map(String::as_str)
    }

    /// Pairs of (placeholder, label) in sample order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.to_placeholder
            .iter()
            .map(|(label, placeholder)| (placeholder.as_str(), label.as_str()))
    }

    /// Zero-based sample position of a placeholder
    pub fn ordinal(&self, placeholder: &str) -> Result<usize, Error> {
        let out_of_range = || Error::Index {
            placeholder: placeholder.to_string(),
            n: self.len(),
        };

        let value = placeholder
            .trim()
            .parse::<usize>()
            .map_err(|_| out_of_range())?;

        match (1..=self.len()).contains(&value) {
            true => Ok(value - 1),
            false => Err(out_of_range()),
        }
    }

    pub fn label(&self, placeholder: &str) -> Result<&str, Error> {
        let idx = self.ordinal(placeholder)?;
        self.to_placeholder
            .get_index(idx)
            .map(|(label, _)| label.as_str())
            .ok_or_else(|| Error::Index {
                placeholder: placeholder.to_string(),
                n: self.len(),
            })
    }

    /// Rebuild a map from (placeholder, label) pairs read back from a key file
    pub fn from_key(pairs: Vec<(String, String)>) -> Result<Self, Error> {
        let mut labels = vec![];
        for (i, (placeholder, label)) in pairs.into_iter().enumerate() {
            if placeholder != (i + 1).to_string() {
                return Err(Error::Configuration(format!(
                    "placeholder key is out of order: expected {} but found {placeholder:?}",
                    i + 1
                )));
            }
            labels.push(label);
        }
        Self::new(&labels)
    }
}
