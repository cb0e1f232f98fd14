use std::time::Duration;

use clap::ValueEnum;
use derive_builder::Builder;
use profwatch_api::model::monitor::ListPolicy;
use profwatch_api::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub trait Context<'a> {
    /// Origin of the detection backend; both endpoints hang off it.
    ///
    /// Example: http://localhost:5000
    fn api_base_url(&self) -> &'a str;
    fn timeout(&self) -> Option<Duration>;
    fn format(&self) -> OutputFormat;
    fn list_policy(&self) -> ListPolicy;
}

#[derive(Clone, Builder, PartialEq, Eq, Debug)]
pub struct Args {
    #[builder(default = "String::from(DEFAULT_BASE_URL)")]
    api_base_url: String,
    #[builder(default)]
    timeout: Option<Duration>,
    #[builder(default)]
    format: OutputFormat,
    #[builder(default)]
    list_policy: ListPolicy,
}

impl Args {
    pub fn builder() -> ArgsBuilder {
        ArgsBuilder::default()
    }
}

impl<'a> Context<'a> for &'a Args {
    fn api_base_url(&self) -> &'a str {
        &self.api_base_url
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn list_policy(&self) -> ListPolicy {
        self.list_policy
    }
}
