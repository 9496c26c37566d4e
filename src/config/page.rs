use log::info;
use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::{ Path, PathBuf };
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageConfigError {
    #[error("failed to read page layout '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse page layout '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid page layout: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionLayout {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub heading: Option<String>,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    #[serde(default = "default_page")]
    pub page: String,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    pub sections: Vec<SectionLayout>,
}

fn default_page() -> String {
    "/".to_string()
}

fn default_viewport_height() -> f64 {
    800.0
}

impl PageLayout {
    fn validate(&self) -> Result<(), PageConfigError> {
        if self.viewport_height <= 0.0 {
            return Err(PageConfigError::Invalid("viewportHeight must be positive".into()));
        }
        for (index, section) in self.sections.iter().enumerate() {
            if section.height < 0.0 || section.top < 0.0 {
                return Err(
                    PageConfigError::Invalid(
                        format!("section #{} has negative geometry", index)
                    )
                );
            }
        }
        Ok(())
    }
}

fn section(id: &str, heading: &str, top: f64, height: f64) -> SectionLayout {
    SectionLayout {
        id: Some(id.to_string()),
        heading: Some(heading.to_string()),
        top,
        height,
    }
}

/// The landing page as it ships: hero, services, process, pricing,
/// testimonials and contact stacked top to bottom.
pub fn default_layout() -> PageLayout {
    PageLayout {
        page: default_page(),
        viewport_height: default_viewport_height(),
        sections: vec![
            section("hero", "Transformamos tu negocio con soluciones digitales", 0.0, 900.0),
            section("services-section", "Nuestros Servicios", 900.0, 1100.0),
            section("process-section", "Nuestro Proceso", 2000.0, 900.0),
            section("pricing-section", "Planes y Precios", 2900.0, 1200.0),
            section("testimonials-section", "Lo que dicen nuestros clientes", 4100.0, 800.0),
            section("contact-section", "Contáctanos", 4900.0, 700.0)
        ],
    }
}

pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<PageLayout, PageConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PageConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let layout: PageLayout = serde_json::from_str(&text).map_err(|source| PageConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    layout.validate()?;
    info!("Loaded page layout with {} sections from {}", layout.sections.len(), path.display());
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_layout_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sections": [ {{ "id": "hero", "top": 0, "height": 500 }} ] }}"#).unwrap();

        let layout = load_layout(file.path()).unwrap();
        assert_eq!(layout.page, "/");
        assert_eq!(layout.viewport_height, 800.0);
        assert_eq!(layout.sections[0].id.as_deref(), Some("hero"));
        assert!(layout.sections[0].heading.is_none());
    }

    #[test]
    fn rejects_negative_geometry() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sections": [ {{ "top": -1, "height": 500 }} ] }}"#).unwrap();

        assert!(matches!(load_layout(file.path()), Err(PageConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(load_layout("/definitely/not/here.json"), Err(PageConfigError::Io { .. })));
    }
}
