//! Result panel component.

use yew::prelude::*;

/// Properties for ResultPanel component.
#[derive(Properties, PartialEq)]
pub struct ResultPanelProps {
    pub text: String,
}

/// Shows the settled outcome of the last submission.
#[function_component(ResultPanel)]
pub fn result_panel(props: &ResultPanelProps) -> Html {
    html! {
        <div class="result-panel">
            { format!("Result: {}", props.text) }
        </div>
    }
}
