use opendma_core::{qname::QualifiedName, value::DataKind};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ChoiceValue
///
/// The closed value subset a choice can carry. Only Integer and String
/// properties can be constrained by a choice list.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ChoiceValue {
    Integer(i32),
    String(String),
}

impl ChoiceValue {
    #[must_use]
    pub const fn kind(&self) -> DataKind {
        match self {
            Self::Integer(_) => DataKind::Integer,
            Self::String(_) => DataKind::String,
        }
    }
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

///
/// Choice
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Choice {
    pub label: String,
    pub value: ChoiceValue,
}

impl Choice {
    #[must_use]
    pub fn integer(label: impl Into<String>, value: i32) -> Self {
        Self {
            label: label.into(),
            value: ChoiceValue::Integer(value),
        }
    }

    #[must_use]
    pub fn string(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: ChoiceValue::String(value.into()),
        }
    }
}

///
/// ChoiceListDef
///
/// A named, ordered enumeration that Integer or String declarations can
/// point at. All choices in one list carry the same value kind.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChoiceListDef {
    pub qname: QualifiedName,
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
}

impl ChoiceListDef {
    #[must_use]
    pub fn new(qname: QualifiedName, display_name: impl Into<String>) -> Self {
        Self {
            qname,
            display_name: display_name.into(),
            choices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    ///
    /// ACCESSORS
    ///

    /// Value kind of the first choice; `None` for an empty list.
    #[must_use]
    pub fn value_kind(&self) -> Option<DataKind> {
        self.choices.first().map(|choice| choice.value.kind())
    }

    /// Whether every choice carries the same value kind.
    #[must_use]
    pub fn is_uniform(&self) -> bool {
        let mut kinds = self.choices.iter().map(|choice| choice.value.kind());
        let Some(first) = kinds.next() else {
            return true;
        };

        kinds.all(|kind| kind == first)
    }

    #[must_use]
    pub fn label_for(&self, value: &ChoiceValue) -> Option<&str> {
        self.choices
            .iter()
            .find(|choice| choice.value == *value)
            .map(|choice| choice.label.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}
