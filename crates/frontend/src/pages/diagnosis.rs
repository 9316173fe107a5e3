//! Survey form page: twenty numeric inputs, a submit button and the result panel.

use std::rc::Rc;

use predict_client::{FormAction, FormController, PredictConfig, submit};
use survey_types::FIELD_KEYS;
use yew::prelude::*;

use crate::components::{FieldInput, ResultPanel};
use crate::transport::GlooTransport;

/// Reducer wrapper so the controller drives re-renders.
#[derive(Default, PartialEq)]
struct FormView(FormController);

impl Reducible for FormView {
    type Action = FormAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(FormView(self.0.apply(action)))
    }
}

/// Endpoint baked in at build time, falling back to the hosted service.
fn predict_config() -> PredictConfig {
    match option_env!("STRESS_PREDICT_URL") {
        Some(url) => PredictConfig::default().with_endpoint(url),
        None => PredictConfig::default(),
    }
}

/// Diagnosis form page component.
#[function_component(DiagnosisPage)]
pub fn diagnosis_page() -> Html {
    let view = use_reducer(FormView::default);
    // Set synchronously on submit; the rendered `disabled` lags one render behind.
    let in_flight = use_mut_ref(|| false);
    let controller = &view.0;

    let on_field_change = {
        let dispatcher = view.dispatcher();
        Callback::from(move |(key, value): (String, String)| {
            dispatcher.dispatch(FormAction::FieldChanged { key, value });
        })
    };

    let on_submit = {
        let view = view.clone();
        let in_flight = in_flight.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if view.0.is_loading() || in_flight.replace(true) {
                return;
            }

            let snapshot = view.0.form().clone();
            let dispatcher = view.dispatcher();
            dispatcher.dispatch(FormAction::SubmitStarted);

            let in_flight = in_flight.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = submit(&GlooTransport, &predict_config(), &snapshot).await;
                *in_flight.borrow_mut() = false;
                dispatcher.dispatch(FormAction::Settled(outcome));
            });
        })
    };

    html! {
        <>
            <form onsubmit={on_submit}>
                { for FIELD_KEYS.iter().map(|key| {
                    let value = controller.form().get(key).unwrap_or_default().to_string();
                    html! {
                        <FieldInput
                            key={*key}
                            name={*key}
                            value={value}
                            on_change={on_field_change.clone()}
                        />
                    }
                })}

                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled={controller.is_loading()}
                >
                    { controller.button_label() }
                </button>
            </form>

            if let Some(text) = controller.result_text() {
                <ResultPanel text={text.to_string()} />
            }
        </>
    }
}
