//! Checking a credential against the remote service, and the startup flow
//! that obtains one.

use crate::backend::GenerativeBackend;
use crate::chat::LineSource;
use crate::credential::{API_KEY_URL, Credential, CredentialStore};
use crate::error::{Error, ErrorKind, Result};
use crate::observability::{CREDENTIAL_REJECTIONS, CREDENTIAL_VERIFICATIONS};
use crate::render::Renderer;

const KEY_PROMPT: &str = "Enter your Google API key: ";
const NO_KEY_FOUND: &str = "No API key found. Please set your Google API key.";
const KEY_SAVED: &str = "API key verified and saved successfully!";
const NO_MODELS: &str = "No models available";
const EMPTY_KEY: &str = "API key must not be empty";

/// Keys checked before giving up, counting a stored one.
const MAX_VERIFICATIONS: usize = 2;

/// Result of checking a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The service accepted the credential.
    Valid,
    /// The service rejected the credential, or offered nothing to use with it.
    Invalid(String),
    /// The check could not be completed.
    Failed(String),
}

impl Verification {
    /// True for [`Verification::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid)
    }

    /// The message to show the user, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Verification::Valid => None,
            Verification::Invalid(message) | Verification::Failed(message) => Some(message),
        }
    }
}

fn invalid_key_message() -> String {
    format!("API key is invalid or expired. Please get a new API key from {API_KEY_URL}")
}

/// Checks `credential` with one model listing.
pub async fn verify<B: GenerativeBackend + ?Sized>(
    backend: &mut B,
    credential: &Credential,
) -> Verification {
    CREDENTIAL_VERIFICATIONS.click();
    backend.configure(credential);
    let verification = match backend.list_models().await {
        Ok(listing) if listing.is_empty() => Verification::Invalid(NO_MODELS.to_string()),
        Ok(_) => Verification::Valid,
        Err(err) => match err.kind() {
            ErrorKind::CredentialInvalid => Verification::Invalid(invalid_key_message()),
            _ => Verification::Failed(format!("Error verifying API key: {err}")),
        },
    };
    if !verification.is_valid() {
        CREDENTIAL_REJECTIONS.click();
    }
    verification
}

/// Produces a credential the service accepts.
///
/// A stored credential is tried first and kept as-is when valid. Otherwise the
/// user is asked for a key, and asked once more after a rejection, so at most
/// two keys are checked in total. An accepted key is saved to `store`; the
/// store is never written when verification fails. A check that could not be
/// completed ends the flow at once.
///
/// # Errors
///
/// [`Error::Authentication`] when the last key is rejected,
/// [`Error::Validation`] when it is empty or could not be checked, and I/O
/// errors from the store.
pub async fn obtain_credential<B, S>(
    store: &CredentialStore,
    backend: &mut B,
    input: &mut S,
    renderer: &mut dyn Renderer,
) -> Result<Credential>
where
    B: GenerativeBackend + ?Sized,
    S: LineSource + ?Sized,
{
    let mut attempts = MAX_VERIFICATIONS;
    match store.load()? {
        Some(stored) => {
            attempts -= 1;
            match verify(backend, &stored).await {
                Verification::Valid => return Ok(stored),
                Verification::Invalid(message) => renderer.print_warning(&message),
                Verification::Failed(message) => {
                    renderer.print_warning(&message);
                    return Err(Error::validation(message));
                }
            }
        }
        None => renderer.print_warning(NO_KEY_FOUND),
    }

    let mut failure = Error::validation(EMPTY_KEY);
    for _ in 0..attempts {
        let Some(entered) = prompt_for_key(input, renderer).await? else {
            renderer.print_warning(EMPTY_KEY);
            failure = Error::validation(EMPTY_KEY);
            continue;
        };
        match verify(backend, &entered).await {
            Verification::Valid => {
                store.save(&entered)?;
                renderer.print_info(KEY_SAVED);
                return Ok(entered);
            }
            Verification::Invalid(message) => {
                renderer.print_warning(&message);
                failure = Error::authentication(message);
            }
            Verification::Failed(message) => {
                renderer.print_warning(&message);
                return Err(Error::validation(message));
            }
        }
    }
    Err(failure)
}

async fn prompt_for_key<S: LineSource + ?Sized>(
    input: &mut S,
    renderer: &mut dyn Renderer,
) -> Result<Option<Credential>> {
    renderer.print_prompt(KEY_PROMPT);
    let line = input.read_line().await?;
    Ok(line.and_then(|line| Credential::new(line).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScriptedBackend;
    use crate::chat::ScriptedInput;
    use crate::render::RecordingRenderer;
    use crate::types::ModelListResponse;

    fn rejected() -> Result<ModelListResponse> {
        Err(Error::bad_request(
            "INVALID_ARGUMENT: API key not valid. Please pass a valid API key. [API_KEY_INVALID]",
        ))
    }

    fn key(value: &str) -> Credential {
        Credential::new(value).unwrap()
    }

    #[tokio::test]
    async fn accepted_key_is_valid() {
        let mut backend = ScriptedBackend::new().accepting();
        assert_eq!(verify(&mut backend, &key("good")).await, Verification::Valid);
        assert_eq!(backend.configured(), vec!["good".to_string()]);
    }

    #[tokio::test]
    async fn rejected_key_is_invalid() {
        let mut backend = ScriptedBackend::new().with_listing(rejected());
        let verification = verify(&mut backend, &key("bad")).await;
        assert_eq!(verification, Verification::Invalid(invalid_key_message()));
        assert!(!verification.is_valid());
    }

    #[tokio::test]
    async fn unauthorized_status_is_invalid() {
        let mut backend =
            ScriptedBackend::new().with_listing(Err(Error::authentication("UNAUTHENTICATED")));
        assert!(matches!(
            verify(&mut backend, &key("bad")).await,
            Verification::Invalid(_)
        ));
    }

    #[tokio::test]
    async fn empty_listing_is_invalid() {
        let mut backend = ScriptedBackend::new().with_listing(Ok(ModelListResponse::default()));
        assert_eq!(
            verify(&mut backend, &key("k")).await,
            Verification::Invalid(NO_MODELS.to_string())
        );
    }

    #[tokio::test]
    async fn other_errors_fail_with_raw_message() {
        let mut backend = ScriptedBackend::new()
            .with_listing(Err(Error::service_unavailable("backend overloaded", None)));
        let verification = verify(&mut backend, &key("k")).await;
        let message = verification.message().unwrap();
        assert!(matches!(verification, Verification::Failed(_)));
        assert!(message.starts_with("Error verifying API key: "));
        assert!(message.contains("backend overloaded"));
    }

    #[tokio::test]
    async fn valid_stored_key_is_used_without_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "GOOGLE_API_KEY=stored").unwrap();
        let store = CredentialStore::new(&path);
        let mut backend = ScriptedBackend::new().accepting();
        let mut input = ScriptedInput::new();
        let mut renderer = RecordingRenderer::new();

        let credential = obtain_credential(&store, &mut backend, &mut input, &mut renderer)
            .await
            .unwrap();
        assert_eq!(credential.expose(), "stored");
        assert_eq!(input.reads(), 0);
        assert!(renderer.output().is_empty());
    }

    #[tokio::test]
    async fn invalid_stored_key_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "GOOGLE_API_KEY=stale").unwrap();
        let store = CredentialStore::new(&path);
        let mut backend = ScriptedBackend::new().with_listing(rejected()).accepting();
        let mut input = ScriptedInput::typed_lines(["fresh"]);
        let mut renderer = RecordingRenderer::new();

        let credential = obtain_credential(&store, &mut backend, &mut input, &mut renderer)
            .await
            .unwrap();
        assert_eq!(credential.expose(), "fresh");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "GOOGLE_API_KEY=fresh");
        assert!(renderer.contains("invalid or expired"));
        assert!(renderer.contains(KEY_SAVED));
    }

    #[tokio::test]
    async fn second_rejection_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "GOOGLE_API_KEY=stale").unwrap();
        let store = CredentialStore::new(&path);
        let mut backend = ScriptedBackend::new()
            .with_listing(rejected())
            .with_listing(rejected());
        let mut input = ScriptedInput::typed_lines(["also-bad", "never-read"]);

        let err = obtain_credential(&store, &mut backend, &mut input, &mut RecordingRenderer::new())
            .await
            .unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(backend.list_calls(), 2);
        assert_eq!(input.remaining(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "GOOGLE_API_KEY=stale");
    }

    #[tokio::test]
    async fn missing_key_allows_one_retry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let store = CredentialStore::new(&path);
        let mut backend = ScriptedBackend::new().with_listing(rejected()).accepting();
        let mut input = ScriptedInput::typed_lines(["bad", "good"]);
        let mut renderer = RecordingRenderer::new();

        let credential = obtain_credential(&store, &mut backend, &mut input, &mut renderer)
            .await
            .unwrap();
        assert_eq!(credential.expose(), "good");
        assert!(renderer.contains(NO_KEY_FOUND));
        assert!(renderer.contains("invalid or expired"));
        assert_eq!(backend.list_calls(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "GOOGLE_API_KEY=good");
    }

    #[tokio::test]
    async fn missing_key_rejected_twice_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let store = CredentialStore::new(&path);
        let mut backend = ScriptedBackend::new()
            .with_listing(rejected())
            .with_listing(rejected());
        let mut input = ScriptedInput::typed_lines(["AIzaBad1", "AIzaBad2", "never-read"]);

        let err = obtain_credential(&store, &mut backend, &mut input, &mut RecordingRenderer::new())
            .await
            .unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(
            backend.configured(),
            vec!["AIzaBad1".to_string(), "AIzaBad2".to_string()]
        );
        assert_eq!(input.remaining(), 1);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn verification_failure_is_fatal_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let store = CredentialStore::new(&path);
        let mut backend =
            ScriptedBackend::new().with_listing(Err(Error::timeout("request timed out", None)));
        let mut input = ScriptedInput::typed_lines(["key", "never-read"]);

        let err = obtain_credential(&store, &mut backend, &mut input, &mut RecordingRenderer::new())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Error verifying API key: "));
        assert_eq!(input.remaining(), 1);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn empty_entry_is_a_failed_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join(".env"));
        let mut backend = ScriptedBackend::new();
        let mut input = ScriptedInput::typed_lines(["   ", ""]);

        let err = obtain_credential(&store, &mut backend, &mut input, &mut RecordingRenderer::new())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), EMPTY_KEY);
        assert_eq!(backend.list_calls(), 0);
        assert_eq!(input.reads(), 2);
    }
}
