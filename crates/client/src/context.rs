// Client context
//
// Built once per process run and passed by reference. Everything in it shares
// one credential, one notification slot, and one executor.

use std::rc::Rc;

use filehost_api_client::{ApiClient, TokenSource};
use filehost_config::{ClientConfig, CredentialStore};
use smol::LocalExecutor;

use crate::credential::Credential;
use crate::files::FilesStore;
use crate::navigation::Navigator;
use crate::notify::Notifier;
use crate::session::SessionStore;
use crate::sharing::SharingStore;

pub struct ClientContext {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub notifier: Notifier,
    pub session: SessionStore,
    pub files: FilesStore,
    pub sharing: SharingStore,
}

impl ClientContext {
    /// Restore the credential from `store` and wire up the stores.
    pub fn new(
        config: ClientConfig,
        store: Box<dyn CredentialStore>,
        navigator: Rc<dyn Navigator>,
        executor: Rc<LocalExecutor<'static>>,
    ) -> Self {
        let notifier = Notifier::new(executor);
        Self::with_notifier(config, store, navigator, notifier)
    }

    pub fn with_notifier(
        config: ClientConfig,
        store: Box<dyn CredentialStore>,
        navigator: Rc<dyn Navigator>,
        notifier: Notifier,
    ) -> Self {
        let credential = Rc::new(Credential::restore(store));
        let tokens: Rc<dyn TokenSource> = credential.clone();
        let api = ApiClient::new(config.clone(), tokens);

        let session = SessionStore::new(api.clone(), credential, notifier.clone(), navigator);
        let files = FilesStore::new(api.clone(), notifier.clone());
        let sharing = SharingStore::new(api.clone(), notifier.clone());

        log::debug!("Client context ready (api base {})", config.api_base);
        Self { config, api, notifier, session, files, sharing }
    }
}
