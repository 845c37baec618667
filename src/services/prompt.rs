//! Sequential input collection with short-circuit on the first dismissal.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputRequest {
    pub title: String,
    pub prompt: String,
    /// Prefilled text.
    pub value: String,
    pub placeholder: Option<String>,
    /// Validation message from the previous attempt.
    pub error: Option<String>,
}

impl InputRequest {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub description: Option<String>,
}

impl PickItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickRequest {
    pub title: String,
    pub items: Vec<PickItem>,
    pub many: bool,
}

/// Host-provided input surface. `None`/`false` means the user dismissed it.
pub trait Prompter {
    fn input(&self, request: &InputRequest) -> Option<String>;

    /// Indices of the picked items; exactly one unless `request.many`.
    fn pick(&self, request: &PickRequest) -> Option<Vec<usize>>;

    fn confirm(&self, message: &str, accept: &str) -> bool;
}

/// The user dismissed a prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aborted;

pub type Step<T> = Result<T, Aborted>;

pub struct Prompts<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> Prompts<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }

    /// Ask until `validate` accepts; the accepted (normalized) value is returned.
    pub fn text(
        &self,
        mut request: InputRequest,
        validate: impl Fn(&str) -> Result<String, String>,
    ) -> Step<String> {
        loop {
            let raw = self.prompter.input(&request).ok_or(Aborted)?;
            match validate(&raw) {
                Ok(v) => return Ok(v),
                Err(msg) => {
                    request.value = raw;
                    request.error = Some(msg);
                }
            }
        }
    }

    pub fn pick_one<T: Clone>(&self, title: &str, choices: &[(T, PickItem)]) -> Step<T> {
        if choices.is_empty() {
            return Err(Aborted);
        }
        let request = PickRequest {
            title: title.to_string(),
            items: choices.iter().map(|(_, item)| item.clone()).collect(),
            many: false,
        };
        let picked = self.prompter.pick(&request).ok_or(Aborted)?;
        picked
            .first()
            .and_then(|&i| choices.get(i))
            .map(|(v, _)| v.clone())
            .ok_or(Aborted)
    }

    /// At least one item must be picked.
    pub fn pick_many<T: Clone>(&self, title: &str, choices: &[(T, PickItem)]) -> Step<Vec<T>> {
        if choices.is_empty() {
            return Err(Aborted);
        }
        let request = PickRequest {
            title: title.to_string(),
            items: choices.iter().map(|(_, item)| item.clone()).collect(),
            many: true,
        };
        let picked = self.prompter.pick(&request).ok_or(Aborted)?;
        let out: Vec<T> = picked
            .into_iter()
            .filter_map(|i| choices.get(i).map(|(v, _)| v.clone()))
            .collect();
        if out.is_empty() { Err(Aborted) } else { Ok(out) }
    }

    pub fn confirm(&self, message: &str, accept: &str) -> Step<()> {
        if self.prompter.confirm(message, accept) {
            Ok(())
        } else {
            Err(Aborted)
        }
    }
}

#[cfg(test)]
#[path = "../tests/services/prompt_tests.rs"]
mod tests;
