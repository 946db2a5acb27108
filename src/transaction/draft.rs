//! The state of the transaction form and the submit workflow.
//!
//! A [TransactionDraft] holds the text the user has typed so far. Submitting
//! the draft validates it, writes the record to a [TransactionStore] and, once
//! the store acknowledges the write, hands the new [Transaction] to the
//! caller's callback and clears the draft.

use crate::{
    stores::{TRANSACTIONS_COLLECTION, TransactionStore},
    transaction::{Transaction, TransactionRecord},
};

/// The errors shown to the user under the form.
///
/// The display text of each variant is the message the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// At least one of the fields was left empty.
    #[error("Please fill in all fields.")]
    MissingFields,

    /// The amount text does not start with a number, e.g. ".".
    #[error("Please enter a valid amount.")]
    InvalidAmount,

    /// The store could not save the transaction.
    ///
    /// The underlying error is logged on the server, never shown to the user.
    #[error("Error adding transaction. Please try again.")]
    Persistence,
}

/// The in-progress values of the transaction form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    /// The transaction name as typed.
    pub name: String,
    /// The amount text, containing only digits and periods.
    pub amount: String,
    /// The date as typed, no format is enforced.
    pub date: String,
    /// The error from the last submission, if it failed.
    pub error: Option<FormError>,
}

impl TransactionDraft {
    /// Create a draft from raw user input.
    ///
    /// Each field goes through the same handler as a keystroke would, so the
    /// amount is sanitized.
    pub fn from_input(name: &str, amount: &str, date: &str) -> Self {
        let mut draft = Self::default();
        draft.set_name(name);
        draft.set_amount(amount);
        draft.set_date(date);

        draft
    }

    /// Replace the name text.
    pub fn set_name(&mut self, text: &str) {
        self.name = text.to_owned();
    }

    /// Replace the amount text with `text` stripped of everything except
    /// digits and periods.
    pub fn set_amount(&mut self, text: &str) {
        self.amount = sanitize_amount(text);
    }

    /// Replace the date text.
    pub fn set_date(&mut self, text: &str) {
        self.date = text.to_owned();
    }

    /// Check that the draft can be submitted and build the record to persist.
    ///
    /// # Errors
    /// Returns [FormError::MissingFields] if any field is empty, or
    /// [FormError::InvalidAmount] if the amount text does not parse to a
    /// finite number.
    pub fn validate(&self) -> Result<TransactionRecord, FormError> {
        if self.name.is_empty() || self.amount.is_empty() || self.date.is_empty() {
            return Err(FormError::MissingFields);
        }

        let amount = parse_amount(&self.amount).ok_or(FormError::InvalidAmount)?;

        Ok(TransactionRecord {
            name: self.name.clone(),
            amount,
            date: self.date.clone(),
        })
    }

    /// Submit the draft to `store`.
    ///
    /// On success `on_add_transaction` is called exactly once with the new
    /// transaction, after the store has acknowledged the write, and the draft
    /// is cleared. On failure the error is recorded on the draft and the
    /// fields are left as typed so the user can try again.
    ///
    /// # Errors
    /// Returns the [FormError] that was recorded on the draft.
    pub async fn submit(
        &mut self,
        store: &dyn TransactionStore,
        on_add_transaction: &(dyn Fn(&Transaction) + Send + Sync),
    ) -> Result<Transaction, FormError> {
        let record = match self.validate() {
            Ok(record) => record,
            Err(error) => {
                self.error = Some(error);
                return Err(error);
            }
        };

        let reference = store.create_ref(TRANSACTIONS_COLLECTION);

        if let Err(error) = store.write(&reference, &record).await {
            tracing::error!("Error adding transaction {}: {error}", reference.path());
            self.error = Some(FormError::Persistence);
            return Err(FormError::Persistence);
        }

        let transaction = record.into_transaction(reference.key());
        on_add_transaction(&transaction);
        self.clear();

        Ok(transaction)
    }

    /// Reset every field and the error.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Remove every character that is not an ASCII digit or a period.
///
/// The number of periods is not limited, "1.2.3" is kept as is.
pub fn sanitize_amount(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Parse the leading number in sanitized amount text.
///
/// The longest prefix that looks like `digits.digits` is parsed and anything
/// after it is ignored, so "1.2.3" parses to 1.2. Returns `None` if the
/// prefix has no digits (e.g. ".") or the number is not finite.
pub fn parse_amount(text: &str) -> Option<f64> {
    let integer_length = text.bytes().take_while(u8::is_ascii_digit).count();
    let (integer, rest) = text.split_at(integer_length);

    let fraction = match rest.strip_prefix('.') {
        Some(after_point) => {
            let fraction_length = after_point.bytes().take_while(u8::is_ascii_digit).count();
            &after_point[..fraction_length]
        }
        None => "",
    };

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let integer = if integer.is_empty() { "0" } else { integer };
    let fraction = if fraction.is_empty() { "0" } else { fraction };

    format!("{integer}.{fraction}")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}


#[cfg(test)]
mod submit_tests {
    use crate::{
        stores::TRANSACTIONS_COLLECTION,
        test_utils::{FakeStore, recording_callback},
        transaction::{Transaction, TransactionRecord},
    };

    use super::{FormError, TransactionDraft};

    fn coffee_draft() -> TransactionDraft {
        TransactionDraft::from_input("Coffee", "4.50", "2024-01-01")
    }

    #[test]
    fn from_input_sanitizes_amount() {
        let draft = TransactionDraft::from_input("Coffee", "4a.5b0", "today");

        assert_eq!(draft.name, "Coffee");
        assert_eq!(draft.amount, "4.50");
        assert_eq!(draft.date, "today");
        assert_eq!(draft.error, None);
    }

    #[test]
    fn set_amount_sanitizes_each_change() {
        let mut draft = TransactionDraft::default();

        draft.set_amount("12a.3b4");
        assert_eq!(draft.amount, "12.34");

        draft.set_amount("1.2.3");
        assert_eq!(draft.amount, "1.2.3");
    }

    #[test]
    fn validate_builds_record() {
        let record = coffee_draft().validate().unwrap();

        assert_eq!(
            record,
            TransactionRecord {
                name: "Coffee".to_owned(),
                amount: 4.5,
                date: "2024-01-01".to_owned(),
            }
        );
    }

    #[test]
    fn validate_accepts_whitespace_name() {
        let draft = TransactionDraft::from_input(" ", "1", " ");

        assert!(draft.validate().is_ok());
    }

    #[tokio::test]
    async fn successful_submit_calls_back_and_clears_draft() {
        let store = FakeStore::with_keys(&["abc123"]);
        let (on_add, calls) = recording_callback();
        let mut draft = coffee_draft();

        let result = draft.submit(&store, on_add.as_ref()).await;

        let want = Transaction {
            id: "abc123".to_owned(),
            name: "Coffee".to_owned(),
            amount: 4.5,
            date: "2024-01-01".to_owned(),
        };
        assert_eq!(result, Ok(want.clone()));
        assert_eq!(*calls.lock().unwrap(), vec![want]);
        assert_eq!(draft, TransactionDraft::default());
    }

    #[tokio::test]
    async fn successful_submit_writes_record_to_transactions() {
        let store = FakeStore::with_keys(&["abc123"]);
        let (on_add, _) = recording_callback();
        let mut draft = coffee_draft();

        draft.submit(&store, on_add.as_ref()).await.unwrap();

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        let (reference, record) = &writes[0];
        assert_eq!(reference.collection(), TRANSACTIONS_COLLECTION);
        assert_eq!(reference.key(), "abc123");
        assert_eq!(record.amount, 4.5);
    }

    #[tokio::test]
    async fn successful_submit_clears_previous_error() {
        let store = FakeStore::new();
        let (on_add, _) = recording_callback();
        let mut draft = coffee_draft();
        draft.error = Some(FormError::Persistence);

        draft.submit(&store, on_add.as_ref()).await.unwrap();

        assert_eq!(draft.error, None);
    }

    #[tokio::test]
    async fn empty_fields_never_reach_the_store() {
        let cases = [
            ("", "4.50", "2024-01-01"),
            ("Coffee", "", "2024-01-01"),
            ("Coffee", "4.50", ""),
            ("", "", ""),
        ];

        for (name, amount, date) in cases {
            let store = FakeStore::new();
            let (on_add, calls) = recording_callback();
            let mut draft = TransactionDraft::from_input(name, amount, date);

            let result = draft.submit(&store, on_add.as_ref()).await;

            assert_eq!(result, Err(FormError::MissingFields));
            assert_eq!(draft.error, Some(FormError::MissingFields));
            assert_eq!(
                (draft.name.as_str(), draft.amount.as_str(), draft.date.as_str()),
                (name, amount, date),
                "draft should be left as typed"
            );
            assert_eq!(store.refs_created(), 0);
            assert!(store.writes().is_empty());
            assert!(calls.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn empty_name_shows_missing_fields_message() {
        let store = FakeStore::new();
        let (on_add, _) = recording_callback();
        let mut draft = TransactionDraft::from_input("", "4.50", "2024-01-01");

        let _ = draft.submit(&store, on_add.as_ref()).await;

        assert_eq!(
            draft.error.map(|error| error.to_string()).as_deref(),
            Some("Please fill in all fields.")
        );
        assert_eq!(draft.amount, "4.50");
        assert_eq!(draft.date, "2024-01-01");
    }

    #[tokio::test]
    async fn non_numeric_amount_never_reaches_the_store() {
        let store = FakeStore::new();
        let (on_add, calls) = recording_callback();
        let mut draft = TransactionDraft::from_input("Coffee", ".", "2024-01-01");

        let result = draft.submit(&store, on_add.as_ref()).await;

        assert_eq!(result, Err(FormError::InvalidAmount));
        assert_eq!(draft.amount, ".");
        assert_eq!(store.refs_created(), 0);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_write_keeps_draft_and_skips_callback() {
        let store = FakeStore::failing();
        let (on_add, calls) = recording_callback();
        let mut draft = coffee_draft();

        let result = draft.submit(&store, on_add.as_ref()).await;

        assert_eq!(result, Err(FormError::Persistence));
        assert_eq!(
            draft.error.map(|error| error.to_string()).as_deref(),
            Some("Error adding transaction. Please try again.")
        );
        assert_eq!(draft.name, "Coffee");
        assert_eq!(draft.amount, "4.50");
        assert_eq!(draft.date, "2024-01-01");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn can_retry_after_failed_write() {
        let failing_store = FakeStore::failing();
        let store = FakeStore::with_keys(&["retry"]);
        let (on_add, calls) = recording_callback();
        let mut draft = coffee_draft();

        let _ = draft.submit(&failing_store, on_add.as_ref()).await;
        let result = draft.submit(&store, on_add.as_ref()).await;

        assert_eq!(result.map(|transaction| transaction.id), Ok("retry".to_owned()));
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(draft, TransactionDraft::default());
    }

    #[tokio::test]
    async fn multiple_periods_persist_leading_number() {
        let store = FakeStore::new();
        let (on_add, _) = recording_callback();
        let mut draft = TransactionDraft::from_input("Tea", "1.2.3", "Monday");

        let transaction = draft.submit(&store, on_add.as_ref()).await.unwrap();

        assert_eq!(transaction.amount, 1.2);
    }
}
