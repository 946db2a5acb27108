//! The transaction form fragment.
//!
//! The form is rendered on the full page and re-rendered in place after each
//! submission, carrying whatever the draft holds at that point.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CARD_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    transaction::{SubmissionToken, TransactionDraft},
};

/// Strips everything except ASCII digits and periods from the amount input as
/// the user types, matching [sanitize_amount](crate::transaction::sanitize_amount).
///
/// The filter runs in the browser so that no response can overwrite text typed
/// after it. The server sanitizes the amount again on submit.
pub(crate) const AMOUNT_INPUT_FILTER: &str = "this.value = this.value.replace(/[^0-9.]/g, '')";

/// Render the amount input.
fn amount_input(value: &str) -> Markup {
    html! {
        input
            name="amount"
            id="amount"
            type="text"
            inputmode="decimal"
            placeholder="Enter amount"
            value=(value)
            oninput=(AMOUNT_INPUT_FILTER)
            class=(FORM_TEXT_INPUT_STYLE);
    }
}

/// Render the form for `draft`, submitted with `submission_token`.
pub fn transaction_form_view(draft: &TransactionDraft, submission_token: SubmissionToken) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            id="transaction-form"
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            class={ (FORM_CARD_STYLE) " space-y-4 md:space-y-6" }
        {
            h2 class="text-xl font-bold" { "Add Transaction" }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Transaction name:" }

                input
                    name="name"
                    id="name"
                    type="text"
                    placeholder="Enter transaction name"
                    value=(draft.name)
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount:" }

                (amount_input(&draft.amount))
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date:" }

                input
                    name="date"
                    id="date"
                    type="text"
                    placeholder="Enter date"
                    value=(draft.date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            input type="hidden" name="submission_token" value=(submission_token);

            @if let Some(error) = draft.error {
                p class={ "form-error " (FORM_ERROR_STYLE) } { (error) }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " Submit"
            }
        }
    }
}
