//! filesystem skill - directory and file operations

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::path::Path;
use tracing::debug;

use crate::skills::{Skill, SkillContext, SkillError, SkillResult};

/// File and directory operations
pub struct FilesystemSkill;

#[async_trait]
impl Skill for FilesystemSkill {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn description(&self) -> &'static str {
        "Create directories, read, write, and list files. Relative paths resolve against the workdir."
    }

    fn actions(&self) -> &'static [&'static str] {
        &["create_directory", "write_file", "read_file", "list_directory"]
    }

    async fn invoke(
        &self,
        action: &str,
        params: &Map<String, Value>,
        ctx: &SkillContext,
    ) -> Result<SkillResult, SkillError> {
        match action {
            "create_directory" => Ok(self.create_directory(params, ctx).await),
            "write_file" => Ok(self.write_file(params, ctx).await),
            "read_file" => Ok(self.read_file(params, ctx).await),
            "list_directory" => Ok(self.list_directory(params, ctx).await),
            _ => Err(SkillError::unknown_action(self.name(), action)),
        }
    }

    async fn execute(&self, _params: &Map<String, Value>, _ctx: &SkillContext) -> SkillResult {
        SkillResult::err("filesystem requires a named action: create_directory, write_file, read_file, or list_directory")
    }
}

impl FilesystemSkill {
    async fn create_directory(&self, params: &Map<String, Value>, ctx: &SkillContext) -> SkillResult {
        let Some(path) = params.get("path").and_then(Value::as_str) else {
            return SkillResult::err("'path' is required");
        };

        let full_path = ctx.resolve_path(Path::new(path));
        if let Err(e) = tokio::fs::create_dir_all(&full_path).await {
            return SkillResult::err(format!("Failed to create directory '{}': {}", path, e));
        }

        debug!(%path, "FilesystemSkill::create_directory: created");
        SkillResult::ok(json!({
            "path": path,
            "message": format!("Directory '{}' created", path),
        }))
    }

    async fn write_file(&self, params: &Map<String, Value>, ctx: &SkillContext) -> SkillResult {
        let Some(path) = params.get("path").and_then(Value::as_str) else {
            return SkillResult::err("'path' is required");
        };
        let Some(content) = params.get("content").and_then(Value::as_str) else {
            return SkillResult::err("'content' is required");
        };
        let overwrite = params.get("overwrite").and_then(Value::as_bool).unwrap_or(false);

        let full_path = ctx.resolve_path(Path::new(path));

        // Strict contract: never replace an existing file without the flag
        if full_path.exists() && !overwrite {
            return SkillResult::err(format!(
                "File '{}' already exists; pass overwrite: true to replace it",
                path
            ));
        }

        if let Some(parent) = full_path.parent()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            return SkillResult::err(format!("Failed to create directories: {}", e));
        }

        if let Err(e) = tokio::fs::write(&full_path, content).await {
            return SkillResult::err(format!("Failed to write file: {}", e));
        }

        debug!(%path, bytes = content.len(), "FilesystemSkill::write_file: written");
        SkillResult::ok(json!({
            "path": path,
            "size": content.len(),
            "message": format!("Wrote {} bytes to {}", content.len(), path),
        }))
    }

    async fn read_file(&self, params: &Map<String, Value>, ctx: &SkillContext) -> SkillResult {
        let Some(path) = params.get("path").and_then(Value::as_str) else {
            return SkillResult::err("'path' is required");
        };

        let full_path = ctx.resolve_path(Path::new(path));
        if !full_path.exists() {
            return SkillResult::err(format!("File '{}' not found", path));
        }

        // Lossy decode: undecodable bytes are replaced, never an error
        let bytes = match tokio::fs::read(&full_path).await {
            Ok(b) => b,
            Err(e) => return SkillResult::err(format!("Failed to read file '{}': {}", path, e)),
        };
        let content = String::from_utf8_lossy(&bytes).into_owned();

        SkillResult::ok(json!({
            "path": path,
            "size": content.len(),
            "content": content,
        }))
    }

    async fn list_directory(&self, params: &Map<String, Value>, ctx: &SkillContext) -> SkillResult {
        let path = params.get("path").and_then(Value::as_str).unwrap_or(".");

        let full_path = ctx.resolve_path(Path::new(path));
        let mut dir = match tokio::fs::read_dir(&full_path).await {
            Ok(d) => d,
            Err(e) => return SkillResult::err(format!("Failed to list directory '{}': {}", path, e)),
        };

        let mut entries = Vec::new();
        while let Ok(Some(entry)) = dir.next_entry().await {
            entries.push(entry.file_name().to_string_lossy().into_owned());
        }
        entries.sort();

        SkillResult::ok(json!({
            "path": path,
            "entries": entries,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn test_ctx(dir: &Path) -> SkillContext {
        SkillContext::new(dir.to_path_buf(), "test".to_string())
    }

    #[tokio::test]
    async fn test_write_and_read_round_trip() {
        let temp = tempdir().unwrap();
        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let written = skill
            .write_file(&params(json!({"path": "out.txt", "content": "Hello, world!"})), &ctx)
            .await;
        assert!(written.success);

        let read = skill.read_file(&params(json!({"path": "out.txt"})), &ctx).await;
        assert!(read.success);
        assert_eq!(read.value["content"], json!("Hello, world!"));
    }

    #[tokio::test]
    async fn test_write_file_creates_directories() {
        let temp = tempdir().unwrap();
        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let result = skill
            .write_file(&params(json!({"path": "nested/dir/out.txt", "content": "content"})), &ctx)
            .await;
        assert!(result.success);

        let content = fs::read_to_string(temp.path().join("nested/dir/out.txt")).unwrap();
        assert_eq!(content, "content");
    }

    #[tokio::test]
    async fn test_write_file_rejects_existing_without_flag() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("out.txt");
        fs::write(&file_path, "original").unwrap();

        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let result = skill
            .write_file(&params(json!({"path": "out.txt", "content": "replacement"})), &ctx)
            .await;

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("already exists"));

        // Rejected overwrite leaves the original untouched
        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "original");
    }

    #[tokio::test]
    async fn test_write_file_overwrite_flag() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("out.txt"), "original").unwrap();

        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let result = skill
            .write_file(
                &params(json!({"path": "out.txt", "content": "replacement", "overwrite": true})),
                &ctx,
            )
            .await;

        assert!(result.success);
        let content = fs::read_to_string(temp.path().join("out.txt")).unwrap();
        assert_eq!(content, "replacement");
    }

    #[tokio::test]
    async fn test_read_file_not_found() {
        let temp = tempdir().unwrap();
        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let result = skill.read_file(&params(json!({"path": "missing.txt"})), &ctx).await;

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_read_file_replaces_invalid_utf8() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("binary.dat"), [0x48, 0x69, 0xff, 0xfe, 0x21]).unwrap();

        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let result = skill.read_file(&params(json!({"path": "binary.dat"})), &ctx).await;

        assert!(result.success);
        let content = result.value["content"].as_str().unwrap();
        assert!(content.starts_with("Hi"));
        assert!(content.contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn test_create_directory() {
        let temp = tempdir().unwrap();
        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let result = skill
            .create_directory(&params(json!({"path": "a/b/c"})), &ctx)
            .await;

        assert!(result.success);
        assert!(temp.path().join("a/b/c").is_dir());
    }

    #[tokio::test]
    async fn test_list_directory() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("b.txt"), "").unwrap();
        fs::write(temp.path().join("a.txt"), "").unwrap();

        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let result = skill.list_directory(&params(json!({})), &ctx).await;

        assert!(result.success);
        assert_eq!(result.value["entries"], json!(["a.txt", "b.txt"]));
    }

    #[tokio::test]
    async fn test_missing_path_param() {
        let temp = tempdir().unwrap();
        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let result = skill.write_file(&params(json!({"content": "x"})), &ctx).await;

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("'path' is required"));
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let temp = tempdir().unwrap();
        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let result = skill.invoke("frobnicate", &Map::new(), &ctx).await;
        assert!(matches!(result, Err(SkillError::UnknownAction { .. })));
    }

    #[tokio::test]
    async fn test_generic_execute_rejected() {
        let temp = tempdir().unwrap();
        let ctx = test_ctx(temp.path());
        let skill = FilesystemSkill;

        let result = skill.execute(&Map::new(), &ctx).await;
        assert!(!result.success);
    }
}
