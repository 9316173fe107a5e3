//! Labelled numeric input for one survey field.

use survey_types::field_label;
use yew::prelude::*;

/// Properties for FieldInput component.
#[derive(Properties, PartialEq)]
pub struct FieldInputProps {
    /// Field key, used as the input id and name.
    pub name: AttrValue,
    pub value: AttrValue,
    /// Receives `(key, new raw value)` on every keystroke.
    pub on_change: Callback<(String, String)>,
}

/// Required numeric input with its label.
#[function_component(FieldInput)]
pub fn field_input(props: &FieldInputProps) -> Html {
    let oninput = {
        let name = props.name.to_string();
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            on_change.emit((name.clone(), input.value()));
        })
    };

    html! {
        <div class="field">
            <label for={props.name.clone()} class="field-label">
                { field_label(&props.name) }
            </label>
            <input
                id={props.name.clone()}
                name={props.name.clone()}
                type="number"
                class="field-input"
                value={props.value.clone()}
                oninput={oninput}
                required=true
            />
        </div>
    }
}
