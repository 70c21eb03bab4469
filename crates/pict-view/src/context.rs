//! Host context: the collaborators a view works through.
//!
//! A view never reaches into its host application. Everything it needs is
//! handed to it in a [`ViewContext`]:
//!
//! | Collaborator | Trait | Default |
//! |--------------|-------|---------|
//! | Template engine | [`TemplateProvider`] | [`MiniJinjaProvider`] |
//! | Data access | [`DataProvider`] | [`MemoryData`](crate::MemoryData) |
//! | Content assignment | [`ContentAssignment`] | [`MemoryContent`](crate::MemoryContent) |
//! | Timestamps | [`Clock`] | [`SystemClock`] |
//! | Identifiers | [`IdGenerator`] | [`UuidGenerator`] |
//!
//! The context is cheap to clone; clones share the same collaborators, which is
//! how several views of one application see the same templates and data.

use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use pict_template::{MiniJinjaProvider, TemplateProvider};
use serde_json::Value;

use crate::memory::{MemoryContent, MemoryData};

/// Timestamp type recorded by lifecycle operations.
pub type Timestamp = DateTime<Utc>;

/// Resolves data addresses to values.
pub trait DataProvider {
    /// Returns the value at `address`, or `None` when nothing is there.
    fn get_data_by_address(&self, address: &str) -> Option<Value>;
}

/// Writes rendered content to destination addresses.
pub trait ContentAssignment {
    fn assign_content(&self, address: &str, content: &str);
}

/// Source of lifecycle timestamps.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Source of unique service identifiers.
pub trait IdGenerator {
    fn new_id(&self) -> String;
}

/// Wall-clock timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// The collaborators of a view.
#[derive(Clone)]
pub struct ViewContext {
    templates: Rc<dyn TemplateProvider>,
    data: Rc<dyn DataProvider>,
    content: Rc<dyn ContentAssignment>,
    clock: Rc<dyn Clock>,
    ids: Rc<dyn IdGenerator>,
    log_noisiness: u8,
}

impl ViewContext {
    /// Creates a builder with every collaborator defaulted.
    pub fn builder() -> ViewContextBuilder {
        ViewContextBuilder::default()
    }

    pub fn templates(&self) -> &dyn TemplateProvider {
        self.templates.as_ref()
    }

    pub fn data(&self) -> &dyn DataProvider {
        self.data.as_ref()
    }

    pub fn content(&self) -> &dyn ContentAssignment {
        self.content.as_ref()
    }

    /// Current time from the context's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// A fresh identifier from the context's generator.
    pub fn new_id(&self) -> String {
        self.ids.new_id()
    }

    /// Verbosity threshold; higher values emit more trace logging.
    pub fn log_noisiness(&self) -> u8 {
        self.log_noisiness
    }
}

impl fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewContext")
            .field("log_noisiness", &self.log_noisiness)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ViewContext`].
#[derive(Default)]
pub struct ViewContextBuilder {
    templates: Option<Rc<dyn TemplateProvider>>,
    data: Option<Rc<dyn DataProvider>>,
    content: Option<Rc<dyn ContentAssignment>>,
    clock: Option<Rc<dyn Clock>>,
    ids: Option<Rc<dyn IdGenerator>>,
    log_noisiness: u8,
}

impl ViewContextBuilder {
    pub fn templates(mut self, templates: Rc<dyn TemplateProvider>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn data(mut self, data: Rc<dyn DataProvider>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn content(mut self, content: Rc<dyn ContentAssignment>) -> Self {
        self.content = Some(content);
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn ids(mut self, ids: Rc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn log_noisiness(mut self, log_noisiness: u8) -> Self {
        self.log_noisiness = log_noisiness;
        self
    }

    pub fn build(self) -> ViewContext {
        ViewContext {
            templates: self
                .templates
                .unwrap_or_else(|| Rc::new(MiniJinjaProvider::new())),
            data: self.data.unwrap_or_else(|| Rc::new(MemoryData::new())),
            content: self.content.unwrap_or_else(|| Rc::new(MemoryContent::new())),
            clock: self.clock.unwrap_or_else(|| Rc::new(SystemClock)),
            ids: self.ids.unwrap_or_else(|| Rc::new(UuidGenerator)),
            log_noisiness: self.log_noisiness,
        }
    }
}
