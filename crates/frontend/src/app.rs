//! Main application component.

use yew::prelude::*;

use crate::pages::DiagnosisPage;

/// Main application component.
#[function_component(App)]
pub fn app() -> Html {
    html! {
        <div class="app-container">
            <main class="card">
                <h1 class="page-title">{"Student Stress Diagnosis"}</h1>
                <DiagnosisPage />
            </main>
        </div>
    }
}
