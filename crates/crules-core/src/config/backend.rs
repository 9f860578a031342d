//! Where configuration documents are stored

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crules_fs::document::{load_json, save_json};
use crules_fs::layout::CONFIG_FILE_NAME;

use super::document::Document;

/// Which document an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Per-user document in the home directory
    Global,
    /// Per-project document in the invoking directory
    Local,
}

impl Scope {
    pub fn other(self) -> Self {
        match self {
            Self::Global => Self::Local,
            Self::Local => Self::Global,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Storage for the global and local documents.
///
/// `load` distinguishes "absent" (`Ok(None)`) from "present but unparseable"
/// (`Err(crules_fs::Error::Parse)`), so callers can refuse to overwrite
/// content they could not read.
pub trait DocumentBackend {
    fn load(&self, scope: Scope) -> crules_fs::Result<Option<Value>>;

    fn save(&self, scope: Scope, document: &Document) -> crules_fs::Result<()>;

    /// Human-readable location of a document, for messages.
    fn location(&self, scope: Scope) -> PathBuf;
}

/// JSON files at `<home>/.cursor-rules.json` and `<cwd>/.cursor-rules.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    global_path: PathBuf,
    local_path: PathBuf,
}

impl FileBackend {
    pub fn new(home: &Path, cwd: &Path) -> Self {
        Self {
            global_path: home.join(CONFIG_FILE_NAME),
            local_path: cwd.join(CONFIG_FILE_NAME),
        }
    }

    fn path(&self, scope: Scope) -> &Path {
        match scope {
            Scope::Global => &self.global_path,
            Scope::Local => &self.local_path,
        }
    }
}

impl DocumentBackend for FileBackend {
    fn load(&self, scope: Scope) -> crules_fs::Result<Option<Value>> {
        load_json(self.path(scope))
    }

    fn save(&self, scope: Scope, document: &Document) -> crules_fs::Result<()> {
        tracing::debug!(scope = %scope, path = %self.path(scope).display(), "Writing configuration document");
        save_json(self.path(scope), document)
    }

    fn location(&self, scope: Scope) -> PathBuf {
        self.path(scope).to_path_buf()
    }
}

/// Documents held as raw text in memory.
///
/// Raw text lets tests seed unparseable content.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: RefCell<HashMap<Scope, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, scope: Scope, text: impl Into<String>) -> Self {
        self.documents.borrow_mut().insert(scope, text.into());
        self
    }

    /// Current raw text of a document.
    pub fn text(&self, scope: Scope) -> Option<String> {
        self.documents.borrow().get(&scope).cloned()
    }
}

impl DocumentBackend for MemoryBackend {
    fn load(&self, scope: Scope) -> crules_fs::Result<Option<Value>> {
        let documents = self.documents.borrow();
        let Some(text) = documents.get(&scope) else {
            return Ok(None);
        };
        serde_json::from_str(text)
            .map(Some)
            .map_err(|e| crules_fs::Error::Parse {
                path: self.location(scope),
                message: e.to_string(),
            })
    }

    fn save(&self, scope: Scope, document: &Document) -> crules_fs::Result<()> {
        let text = serde_json::to_string_pretty(document).map_err(|e| {
            crules_fs::Error::Serialize {
                path: self.location(scope),
                message: e.to_string(),
            }
        })?;
        self.documents.borrow_mut().insert(scope, text);
        Ok(())
    }

    fn location(&self, scope: Scope) -> PathBuf {
        PathBuf::from(format!("<memory:{}>", scope))
    }
}

impl<B: DocumentBackend + ?Sized> DocumentBackend for &B {
    fn load(&self, scope: Scope) -> crules_fs::Result<Option<Value>> {
        (**self).load(scope)
    }

    fn save(&self, scope: Scope, document: &Document) -> crules_fs::Result<()> {
        (**self).save(scope, document)
    }

    fn location(&self, scope: Scope) -> PathBuf {
        (**self).location(scope)
    }
}
