//! Presentation model derived from a `Converter`

use crate::core::controller::{Converter, LoadState};

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub amount: String,
    pub from: String,
    pub to: String,
    pub currencies: Vec<String>,
    pub result: Option<String>,
}

/// Exactly one branch is shown at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Empty,
    Loading,
    Failed { message: String },
    Form(FormView),
}

pub fn render(converter: &Converter) -> View {
    match converter.state() {
        LoadState::Idle => View::Empty,
        LoadState::Loading => View::Loading,
        LoadState::Failed(message) => View::Failed {
            message: message.clone(),
        },
        LoadState::Ready(table) => {
            let request = converter.request();
            View::Form(FormView {
                amount: request.amount.to_string(),
                from: request.from.clone(),
                to: request.to.clone(),
                currencies: table.codes().map(str::to_string).collect(),
                result: converter.result().map(ToString::to_string),
            })
        }
    }
}
