use crate::actions::{download_file_name, pretty_json, Command, CopyTarget};
use crate::loader::FileRecord;
use anyhow::Result;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectorAction {
    CopyUrl,
    CopyData,
    Download,
}

#[derive(Debug, Clone)]
pub struct OpenRecord {
    pub record: Arc<FileRecord>,
    /// Read-only body text.
    pub pretty: String,
}

#[derive(Debug, Clone, Default)]
pub enum InspectorState {
    #[default]
    Closed,
    Open(OpenRecord),
}

/// Modal detail view. At most one record is displayed at a time.
#[derive(Debug, Default)]
pub struct Inspector {
    state: InspectorState,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `record`, replacing whatever was open.
    pub fn open(&mut self, record: Arc<FileRecord>) {
        let pretty = pretty_json(&record.data)
            .unwrap_or_else(|err| format!("<unable to format JSON: {err:#}>"));
        self.state = InspectorState::Open(OpenRecord { record, pretty });
    }

    pub fn close(&mut self) {
        self.state = InspectorState::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, InspectorState::Open(_))
    }

    pub fn current(&self) -> Option<&OpenRecord> {
        match &self.state {
            InspectorState::Open(open) => Some(open),
            InspectorState::Closed => None,
        }
    }

    /// Builds the command for `action` against the displayed record.
    /// Returns `Ok(None)` when nothing is open.
    pub fn action(&self, action: InspectorAction) -> Result<Option<Command>> {
        let Some(open) = self.current() else {
            return Ok(None);
        };
        let record = &open.record;
        let command = match action {
            InspectorAction::CopyUrl => Command::Copy {
                text: record.url.clone(),
                target: CopyTarget::Url,
            },
            InspectorAction::CopyData => Command::Copy {
                text: pretty_json(&record.data)?,
                target: CopyTarget::Data,
            },
            InspectorAction::Download => Command::SaveJson {
                file_name: download_file_name(&record.name),
                contents: pretty_json(&record.data)?,
            },
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RecordId;
    use crate::registry::FileDescriptor;
    use serde_json::{json, Value};

    fn record(idx: usize, name: &str, data: Value) -> Arc<FileRecord> {
        Arc::new(FileRecord::from_parts(
            RecordId(idx),
            &FileDescriptor::new(name, None, "x"),
            data,
            format!("https://example.org/{name}"),
        ))
    }

    #[test]
    fn starts_closed() {
        let inspector = Inspector::new();
        assert!(!inspector.is_open());
        assert!(inspector.current().is_none());
        assert_eq!(
            inspector.action(InspectorAction::CopyUrl).expect("no error"),
            None
        );
    }

    #[test]
    fn open_shows_pretty_body_and_close_resets() {
        let mut inspector = Inspector::new();
        inspector.open(record(0, "a.json", json!({"k": [1, 2]})));
        let open = inspector.current().expect("open");
        assert_eq!(open.record.name, "a.json");
        assert_eq!(open.pretty, "{\n  \"k\": [\n    1,\n    2\n  ]\n}");

        inspector.close();
        assert!(!inspector.is_open());
    }

    #[test]
    fn opening_second_record_replaces_first() {
        let mut inspector = Inspector::new();
        inspector.open(record(0, "a.json", json!([1])));
        inspector.open(record(1, "b.json", json!({"b": true})));
        let open = inspector.current().expect("open");
        assert_eq!(open.record.name, "b.json");
        assert!(open.pretty.contains("\"b\": true"));
    }

    #[test]
    fn actions_bind_to_displayed_record() {
        let mut inspector = Inspector::new();
        inspector.open(record(0, "a.json", json!([1])));
        inspector.open(record(1, "nested/b.json", json!({"b": 1})));

        let copy_url = inspector.action(InspectorAction::CopyUrl).expect("ok");
        assert_eq!(
            copy_url,
            Some(Command::Copy {
                text: "https://example.org/nested/b.json".to_string(),
                target: CopyTarget::Url,
            })
        );

        let Some(Command::Copy { text, target }) =
            inspector.action(InspectorAction::CopyData).expect("ok")
        else {
            panic!("expected copy command");
        };
        assert_eq!(target, CopyTarget::Data);
        assert_eq!(text, "{\n  \"b\": 1\n}");

        let Some(Command::SaveJson {
            file_name,
            contents,
        }) = inspector.action(InspectorAction::Download).expect("ok")
        else {
            panic!("expected save command");
        };
        assert_eq!(file_name, "b.json");
        assert_eq!(contents, text);
    }
}
