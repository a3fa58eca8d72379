use serde::{Deserialize, Serialize};

/// Uniform `{ data, errors }` response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self { data: Vec::new(), errors: Vec::new() }
    }
}

impl<T> Envelope<T> {
    pub fn single(item: T) -> Self {
        Self { data: vec![item], errors: Vec::new() }
    }

    pub fn from_errors<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { data: Vec::new(), errors: errors.into_iter().map(Into::into).collect() }
    }
}
