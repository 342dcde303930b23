use std::path::{Component, Path, PathBuf};

use crate::context::{handler as wrap, HandlerFunc};
use crate::http::response::StatusCode;

/// Joins `file` onto `root`, refusing anything that could escape it.
pub fn resolve(root: &Path, file: &str) -> Option<PathBuf> {
    let relative = Path::new(file);
    let safe = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if file.is_empty() || !safe {
        return None;
    }
    Some(root.join(relative))
}

/// Handler reading `filepath` below `root`. Missing files get a bare 404.
///
/// The read is synchronous and runs on the worker driving the connection.
pub fn handler(root: PathBuf) -> HandlerFunc {
    wrap(move |c| {
        let file = c.param("filepath").unwrap_or_default().to_string();

        let Some(path) = resolve(&root, &file).filter(|p| p.is_file()) else {
            c.status(StatusCode::NotFound);
            return;
        };

        match std::fs::read(&path) {
            Ok(contents) => {
                let mime = mime_guess::from_path(&path).first_or_octet_stream();
                c.set_header("Content-Type", mime.essence_str());
                c.data(StatusCode::Ok, &contents);
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Static file not served");
                c.status(StatusCode::NotFound);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_rejects_parent_components() {
        let root = Path::new("/srv/static");
        assert!(resolve(root, "../secret").is_none());
        assert!(resolve(root, "css/../../secret").is_none());
        assert!(resolve(root, "/etc/passwd").is_none());
        assert!(resolve(root, "").is_none());
        assert_eq!(resolve(root, "css/a.css"), Some(root.join("css/a.css")));
    }
}
