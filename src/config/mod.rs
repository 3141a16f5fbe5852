mod agent_config;
mod env_vars;

pub use agent_config::{
    read_settings,
    write_config_template,
    AgentConfig,
    FileErrorPolicy,
    LoadedConfig,
    CONFIG_TEMPLATE,
};

pub use env_vars::expand_env_vars;
