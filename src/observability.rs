use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("gemini_chat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("gemini_chat.client.request_errors");
pub(crate) static CLIENT_LIST_MODELS: Counter = Counter::new("gemini_chat.client.list_models");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("gemini_chat.client.request_duration_seconds");

pub(crate) static SESSION_EXCHANGES: Counter = Counter::new("gemini_chat.session.exchanges");
pub(crate) static SESSION_EXCHANGE_ERRORS: Counter =
    Counter::new("gemini_chat.session.exchange_errors");
pub(crate) static SESSION_CREDENTIAL_REVOKED: Counter =
    Counter::new("gemini_chat.session.credential_revoked");

pub(crate) static CREDENTIAL_VERIFICATIONS: Counter =
    Counter::new("gemini_chat.credential.verifications");
pub(crate) static CREDENTIAL_REJECTIONS: Counter =
    Counter::new("gemini_chat.credential.rejections");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_LIST_MODELS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_EXCHANGES);
    collector.register_counter(&SESSION_EXCHANGE_ERRORS);
    collector.register_counter(&SESSION_CREDENTIAL_REVOKED);

    collector.register_counter(&CREDENTIAL_VERIFICATIONS);
    collector.register_counter(&CREDENTIAL_REJECTIONS);
}
