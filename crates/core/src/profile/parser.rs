use crate::error::{PagecutError, Result};
use crate::profile::directives::{SiteProfile, parse_directive};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Site profile file parser
#[derive(Debug)]
pub struct ProfileParser;

impl ProfileParser {
    /// Parse a single profile file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SiteProfile> {
        let file = std::fs::File::open(&path).map_err(|e| {
            PagecutError::ProfileError(format!("Cannot open file {}: {}", path.as_ref().display(), e))
        })?;

        Self::parse_reader(BufReader::new(file))
    }

    /// Parse a profile from a reader
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<SiteProfile> {
        let mut profile = SiteProfile::new();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line =
                line.map_err(|e| PagecutError::ProfileError(format!("Read error at line {}: {}", line_number, e)))?;
            Self::parse_line(&mut profile, &line, line_number)?;
        }

        Ok(profile)
    }

    /// Parse a profile from a string
    pub fn parse_string(content: &str) -> Result<SiteProfile> {
        let mut profile = SiteProfile::new();

        for (index, line) in content.lines().enumerate() {
            Self::parse_line(&mut profile, line, index + 1)?;
        }

        Ok(profile)
    }

    fn parse_line(profile: &mut SiteProfile, line: &str, line_number: usize) -> Result<()> {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        match parse_directive(line) {
            Ok(directive) => {
                profile.add_directive(directive);
                Ok(())
            }
            Err(e) => Err(PagecutError::ProfileError(format!("Parse error at line {}: {}", line_number, e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_string_basic() {
        let content = r#"
# Example profile
title_tag: h1
title_class: text-brand-purple-black
body_class_contains: lg:w-2/3
body_class_contains: flex
body_class_contains: gap-10
embed_title: no
"#;

        let profile = ProfileParser::parse_string(content).unwrap();

        assert_eq!(profile.title_tag.as_deref(), Some("h1"));
        assert_eq!(profile.title_class.as_deref(), Some("text-brand-purple-black"));
        assert_eq!(profile.body_class_contains, vec!["lg:w-2/3", "flex", "gap-10"]);
        assert_eq!(profile.embed_title, Some(false));
    }

    #[test]
    fn test_parse_string_repeated_directives() {
        let content = r#"
body_selector: main .post
body_selector: div#content
allowed_domain: safeguardglobal.com
allowed_domain: example.org
"#;

        let profile = ProfileParser::parse_string(content).unwrap();

        assert_eq!(profile.body_selectors, vec!["main .post", "div#content"]);
        assert_eq!(profile.allowed_domains, vec!["safeguardglobal.com", "example.org"]);
    }

    #[test]
    fn test_parse_reader() {
        let cursor = Cursor::new("fallback_tag: main\ndefault_alt: Photo\n");
        let profile = ProfileParser::parse_reader(cursor).unwrap();

        assert_eq!(profile.fallback_tag.as_deref(), Some("main"));
        assert_eq!(profile.default_alt.as_deref(), Some("Photo"));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let content = "title_tag: h1\n\n# comment\nnot a directive\n";
        let err = ProfileParser::parse_string(content).unwrap_err();

        assert!(matches!(err, PagecutError::ProfileError(_)));
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_parse_unknown_directive() {
        let err = ProfileParser::parse_string("strip_id_or_class: sidebar").unwrap_err();
        assert!(err.to_string().contains("Unknown directive"));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = ProfileParser::parse_file("/nonexistent/profile.txt");
        assert!(matches!(result, Err(PagecutError::ProfileError(_))));
    }

    #[test]
    fn test_parse_empty_and_comments() {
        let profile = ProfileParser::parse_string("# only a comment\n\n   \n").unwrap();
        assert!(profile.is_empty());
    }
}
