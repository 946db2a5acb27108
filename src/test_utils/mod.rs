#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod store;

pub(crate) use form::{
    assert_form_error_message, assert_form_input_with_value, assert_form_submit_button_with_text,
    assert_hx_endpoint, assert_no_form_error_message, get_submission_token, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_status_ok, get_header};
pub(crate) use store::{FakeStore, GatedStore, recording_callback};
