use crate::error::{PagecutError, Result};
use crate::profile::directives::SiteProfile;
use crate::profile::parser::ProfileParser;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loader resolving site profiles by domain
#[derive(Debug, Clone)]
pub struct ProfileLoader {
    /// User profile directory, takes precedence
    custom_dir: Option<PathBuf>,
    /// Profiles shipped alongside the binary
    standard_dir: Option<PathBuf>,
    /// Profile cache keyed by domain
    cache: HashMap<String, SiteProfile>,
}

impl ProfileLoader {
    /// Create a loader without any directories
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None, cache: HashMap::new() }
    }

    pub fn builder() -> ProfileLoaderBuilder {
        ProfileLoaderBuilder::new()
    }

    /// Load the profile for a URL's host
    pub fn load_for_url(&mut self, url: &str) -> Result<SiteProfile> {
        let domain = extract_domain(url)?;
        self.load_for_domain(&domain)
    }

    /// Load the profile for a domain.
    ///
    /// All matching files are merged, custom over standard and the most
    /// specific name over parent domains. No file yields the empty profile.
    pub fn load_for_domain(&mut self, domain: &str) -> Result<SiteProfile> {
        let domain = domain.to_lowercase();
        if let Some(profile) = self.cache.get(&domain) {
            return Ok(profile.clone());
        }

        let mut merged = SiteProfile::new();

        for file_path in self.find_profile_files(&domain).iter().rev() {
            match ProfileParser::parse_file(file_path) {
                Ok(profile) => {
                    debug!(path = %file_path.display(), "loaded site profile");
                    merged.merge(&profile);
                }
                Err(e) => warn!(path = %file_path.display(), error = %e, "skipping unreadable site profile"),
            }
        }

        self.cache.insert(domain, merged.clone());
        Ok(merged)
    }

    /// Find all profile files for a domain, highest priority first
    fn find_profile_files(&self, domain: &str) -> Vec<PathBuf> {
        let names = generate_profile_names(domain);
        let mut files = Vec::new();

        for dir in [&self.custom_dir, &self.standard_dir].into_iter().flatten() {
            for name in &names {
                let file_path = dir.join(name);
                if file_path.is_file() && !files.contains(&file_path) {
                    files.push(file_path);
                }
            }
        }

        files
    }

    /// Clear the profile cache
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// Candidate file names for a domain, most specific first
fn generate_profile_names(domain: &str) -> Vec<String> {
    let mut names = vec![format!("{}.txt", domain)];

    if let Some(without_www) = domain.strip_prefix("www.") {
        names.push(format!("{}.txt", without_www));
    }

    let parts: Vec<&str> = domain.split('.').collect();
    for i in 1..parts.len().saturating_sub(1) {
        let parent = format!("{}.txt", parts[i..].join("."));
        if !names.contains(&parent) {
            names.push(parent);
        }
    }

    names
}

fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url).map_err(|e| PagecutError::InvalidUrl(e.to_string()))?;

    let domain = url
        .host_str()
        .ok_or_else(|| PagecutError::InvalidUrl("No domain found in URL".to_string()))?;

    Ok(domain.to_string())
}

/// Builder for ProfileLoader
#[derive(Debug, Default)]
pub struct ProfileLoaderBuilder {
    custom_dir: Option<PathBuf>,
    standard_dir: Option<PathBuf>,
}

impl ProfileLoaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user profile directory
    pub fn custom_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.custom_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the standard profile directory
    pub fn standard_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.standard_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> ProfileLoader {
        ProfileLoader { custom_dir: self.custom_dir, standard_dir: self.standard_dir, cache: HashMap::new() }
    }
}

impl Default for ProfileLoader {
    fn default() -> Self {
        let mut builder = ProfileLoaderBuilder::new();

        if let Some(custom_dir) = Self::default_custom_dir() {
            builder = builder.custom_dir(custom_dir);
        }

        if let Some(standard_dir) = Self::default_standard_dir() {
            builder = builder.standard_dir(standard_dir);
        }

        builder.build()
    }
}

impl ProfileLoader {
    /// ~/.config/pagecut/sites
    fn default_custom_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("pagecut").join("sites"))
    }

    /// `site_profiles` in the working directory, if present
    fn default_standard_dir() -> Option<PathBuf> {
        let std_dir = PathBuf::from("site_profiles");
        if std_dir.is_dir() { Some(std_dir) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_profile_names() {
        let names = generate_profile_names("www.safeguardglobal.com");
        assert_eq!(names, vec!["www.safeguardglobal.com.txt", "safeguardglobal.com.txt"]);

        let names = generate_profile_names("news.bbc.co.uk");
        assert!(names.contains(&"news.bbc.co.uk.txt".to_string()));
        assert!(names.contains(&"bbc.co.uk.txt".to_string()));
        assert!(!names.iter().any(|n| n == "uk.txt"));
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://www.example.com/path").unwrap(), "www.example.com");
        assert!(extract_domain("not a url").is_err());
    }

    #[test]
    fn test_load_for_url_strips_www() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("safeguardglobal.com.txt"), "title_class: hero-title\n").unwrap();

        let mut loader = ProfileLoader::builder().custom_dir(temp_dir.path()).build();
        let profile = loader.load_for_url("https://www.safeguardglobal.com/resources/blog/x").unwrap();

        assert_eq!(profile.title_class.as_deref(), Some("hero-title"));
    }

    #[test]
    fn test_missing_profile_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = ProfileLoader::builder().custom_dir(temp_dir.path()).build();

        assert!(loader.load_for_domain("unknown.example").unwrap().is_empty());
    }

    #[test]
    fn test_custom_overrides_standard() {
        let temp_dir = TempDir::new().unwrap();
        let custom = temp_dir.path().join("custom");
        let standard = temp_dir.path().join("standard");
        fs::create_dir_all(&custom).unwrap();
        fs::create_dir_all(&standard).unwrap();

        fs::write(custom.join("example.com.txt"), "embed_title: yes\n").unwrap();
        fs::write(standard.join("example.com.txt"), "embed_title: no\nfallback_tag: main\n").unwrap();

        let mut loader = ProfileLoader::builder().custom_dir(&custom).standard_dir(&standard).build();
        let profile = loader.load_for_domain("example.com").unwrap();

        assert_eq!(profile.embed_title, Some(true));
        assert_eq!(profile.fallback_tag.as_deref(), Some("main"));
    }

    #[test]
    fn test_specific_overrides_parent() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("example.com.txt"), "title_tag: h1\ndefault_alt: Parent\n").unwrap();
        fs::write(temp_dir.path().join("blog.example.com.txt"), "default_alt: Child\n").unwrap();

        let mut loader = ProfileLoader::builder().custom_dir(temp_dir.path()).build();
        let profile = loader.load_for_domain("blog.example.com").unwrap();

        assert_eq!(profile.title_tag.as_deref(), Some("h1"));
        assert_eq!(profile.default_alt.as_deref(), Some("Child"));
    }

    #[test]
    fn test_invalid_profile_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("example.com.txt"), "garbage line\n").unwrap();

        let mut loader = ProfileLoader::builder().custom_dir(temp_dir.path()).build();
        assert!(loader.load_for_domain("example.com").unwrap().is_empty());
    }

    #[test]
    fn test_profile_caching() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("example.com.txt");
        fs::write(&path, "title_tag: h2\n").unwrap();

        let mut loader = ProfileLoader::builder().custom_dir(temp_dir.path()).build();
        let first = loader.load_for_domain("example.com").unwrap();

        fs::write(&path, "title_tag: h3\n").unwrap();
        assert_eq!(loader.load_for_domain("example.com").unwrap(), first);

        loader.clear_cache();
        assert_eq!(loader.load_for_domain("example.com").unwrap().title_tag.as_deref(), Some("h3"));
    }
}
