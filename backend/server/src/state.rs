use std::sync::Arc;

use agent::Agent;
use anyhow::Error;
use reqwest::Client;

use super::{config::Config, render::fonts::Fonts};

pub struct AppState {
    pub config: Config,
    pub fonts: Arc<Fonts>,
    pub agent: Agent,
    pub client: Client,
}

impl AppState {
    pub fn new() -> Result<Arc<Self>, Error> {
        let config = Config::load()?;
        let fonts = Fonts::load(&config.font_dir)?;

        Ok(Self::with(config, fonts))
    }

    pub fn with(config: Config, fonts: Fonts) -> Arc<Self> {
        let agent = Agent::new(config.agent_url.clone(), config.agent_timeout);

        Arc::new(Self {
            config,
            fonts: Arc::new(fonts),
            agent,
            client: Client::new(),
        })
    }
}
