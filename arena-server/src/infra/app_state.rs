use std::{fmt, sync::Arc};

use arena_config::Config;
use arena_core::application::{
    AccountService, AppUnitOfWork, FavoritesService, ListingService,
};
use arena_core::auth::{AuthCrypto, TokenIssuer};
use arena_core::storage::ObjectStorage;
use arena_core::translation::AutoTranslator;

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub config: Arc<Config>,
    pub listings: Arc<ListingService>,
    pub favorites: Arc<FavoritesService>,
    pub accounts: Arc<AccountService>,
    pub storage: Arc<dyn ObjectStorage>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("unit_of_work", &self.unit_of_work)
            .field("storage", &self.storage.backend())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        unit_of_work: AppUnitOfWork,
        storage: Arc<dyn ObjectStorage>,
        translator: AutoTranslator,
        crypto: AuthCrypto,
    ) -> Self {
        let tokens = TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl());
        let accounts = AccountService::new(
            Arc::clone(&unit_of_work.users),
            Arc::new(crypto),
            Arc::new(tokens),
        );

        Self {
            listings: Arc::new(ListingService::new(unit_of_work.clone(), translator)),
            favorites: Arc::new(FavoritesService::new(unit_of_work.clone())),
            accounts: Arc::new(accounts),
            unit_of_work: Arc::new(unit_of_work),
            config,
            storage,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn translator(&self) -> &AutoTranslator {
        self.listings.translator()
    }

    pub fn tokens(&self) -> &TokenIssuer {
        self.accounts.tokens()
    }
}
