//! One CLI invocation behaves like one page load: restore the credential,
//! run a single command on a local executor, render notifications as they
//! appear, and let any pending reveal finish before exiting.

use std::future::Future;
use std::path::PathBuf;
use std::rc::Rc;

use filehost_client::{ClientContext, History, Navigator, NotificationMessage, Route, Severity};
#[cfg(feature = "keychain")]
use filehost_config::KeychainStore;
use filehost_config::{ClientConfig, CredentialStore, FileStore, MemoryStore};
use smol::LocalExecutor;

use crate::exit_codes::*;
use crate::{CliError, StoreKind};

pub struct Page {
    pub ctx: ClientContext,
    history: Rc<History>,
    executor: Rc<LocalExecutor<'static>>,
}

/// Global options that shape the page.
pub struct PageOptions {
    pub config: ClientConfig,
    pub store: StoreKind,
    pub credentials_file: Option<PathBuf>,
}

impl Page {
    pub fn load(options: PageOptions) -> Result<Self, CliError> {
        let store = open_store(options.store, options.credentials_file)?;
        let history = Rc::new(History::new());
        let navigator: Rc<dyn Navigator> = history.clone();
        let executor = Rc::new(LocalExecutor::new());

        let ctx = ClientContext::new(options.config, store, navigator, executor.clone());
        ctx.notifier.on_display(render);

        Ok(Self { ctx, history, executor })
    }

    /// Drive `future` to completion, then wait out any pending reveal so
    /// the last message is rendered.
    pub fn run<T>(&self, future: impl Future<Output = T>) -> T {
        smol::block_on(self.executor.run(async {
            let output = future.await;
            self.ctx.notifier.settled().await;
            output
        }))
    }

    /// Where the session store last sent the user.
    pub fn route(&self) -> Option<Route> {
        self.history.current()
    }

    /// Restore the session the way a protected view does before it renders.
    pub fn require_session(&self) -> Result<(), CliError> {
        if !self.ctx.session.is_authenticated() {
            return Err(CliError {
                code: EXIT_NOT_AUTH,
                message: "Not logged in".into(),
                hint: Some("run `fhost login <username>` first".into()),
            });
        }

        self.run(self.ctx.session.initialize_session());

        if self.route() == Some(Route::Login) {
            return Err(CliError {
                code: EXIT_SESSION_EXPIRED,
                message: String::new(),
                hint: Some("run `fhost login <username>` to sign in again".into()),
            });
        }
        Ok(())
    }
}

fn open_store(
    kind: StoreKind,
    path: Option<PathBuf>,
) -> Result<Box<dyn CredentialStore>, CliError> {
    log::debug!("Credential store: {:?}", kind);
    let store: Box<dyn CredentialStore> = match kind {
        StoreKind::Memory => Box::new(MemoryStore::new()),
        StoreKind::File => match path {
            Some(path) => Box::new(FileStore::new(path)),
            None => Box::new(FileStore::default_location().map_err(|e| CliError {
                code: EXIT_ERROR,
                message: e.to_string(),
                hint: Some("pass --credentials-file <PATH>".into()),
            })?),
        },
        #[cfg(feature = "keychain")]
        StoreKind::Keychain => Box::new(KeychainStore::new()),
    };
    Ok(store)
}

fn render(message: &NotificationMessage) {
    let tag = match message.severity {
        Severity::Success => "ok",
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    eprintln!("{}: {}", tag, message.text);
}
