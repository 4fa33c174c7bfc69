//! Challenge content.
//!
//! A challenge is static content: markup to style, the styles a learner
//! starts from, and the tasks that check their progress. The built-in
//! catalog can be extended with challenges read from JSON files.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::verify::Task;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub starting_styles: String,
    pub markup: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Challenge {
    /// Parse a challenge from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let challenge: Challenge = serde_json::from_str(json)?;
        challenge.validate()?;
        Ok(challenge)
    }

    fn validate(&self) -> Result<()> {
        let slug_ok = !self.slug.is_empty()
            && self
                .slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !slug_ok {
            return Err(Error::InvalidContent(format!(
                "invalid challenge slug `{}`",
                self.slug
            )));
        }
        Ok(())
    }
}

const SNOWMAN: &str = include_str!("data/snowman.json");
const GRADIENT_BORDER_CARD: &str = include_str!("data/animated-gradient-border-card.json");

const CHESSBOARD_STYLES: &str = "
#chessboard {
  width: 100%;
  aspect-ratio: 1;
  background-color: #000;
  transform: rotate3d(5, 0, 1, 45deg);
}

table,th,td {
  border: 3px solid #9ca3af;
}

tr:nth-of-type(odd) td:nth-of-type(odd) {
  background-color: #dc2626;
}

tr:nth-of-type(even) td:nth-of-type(even) {
  background-color: #dc2626;
}
";

/// An 8x8 table, rank 8 first, with `row-N` rows and `square-x` cells.
fn chessboard_markup() -> String {
    let mut markup = String::from("\n<table id=\"chessboard\">\n");
    for rank in (1..=8).rev() {
        let _ = writeln!(markup, "  <tr id=\"row-{rank}\">");
        for file in 'a'..='h' {
            let _ = writeln!(markup, "    <td id=\"square-{file}\"></td>");
        }
        markup.push_str("  </tr>\n");
    }
    markup.push_str("</table>\n");
    markup
}

fn chessboard() -> Challenge {
    Challenge {
        title: "♖️ Chessboard".to_string(),
        slug: "chessboard".to_string(),
        intro: "Let's make a chessboard!".to_string(),
        starting_styles: CHESSBOARD_STYLES.to_string(),
        markup: chessboard_markup(),
        tasks: Vec::new(),
    }
}

/// The challenges available to a session, in display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    challenges: Vec<Challenge>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The challenges shipped with the crate.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        catalog.insert(Challenge::from_json(GRADIENT_BORDER_CARD)?);
        catalog.insert(chessboard());
        catalog.insert(Challenge::from_json(SNOWMAN)?);
        Ok(catalog)
    }

    /// Add a challenge, replacing any with the same slug.
    pub fn insert(&mut self, challenge: Challenge) {
        match self.challenges.iter_mut().find(|c| c.slug == challenge.slug) {
            Some(existing) => *existing = challenge,
            None => self.challenges.push(challenge),
        }
    }

    /// Add every `*.json` challenge in `dir`, in file name order.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in &paths {
            let json = fs::read_to_string(path)?;
            let challenge = Challenge::from_json(&json).map_err(|e| {
                Error::InvalidContent(format!("{}: {e}", path.display()))
            })?;
            log::debug!("loaded challenge `{}` from {}", challenge.slug, path.display());
            self.insert(challenge);
        }
        Ok(paths.len())
    }

    pub fn find(&self, slug: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.slug == slug)
    }

    pub fn get(&self, slug: &str) -> Result<&Challenge> {
        self.find(slug)
            .ok_or_else(|| Error::ChallengeNotFound(slug.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::RequirementSet;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let slugs: Vec<_> = catalog.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, ["animated-gradient-border-card", "chessboard", "snowman"]);

        let snowman = catalog.get("snowman").unwrap();
        assert_eq!(snowman.tasks.len(), 6);
        assert!(matches!(snowman.tasks[4].requirement, RequirementSet::All(ref r) if r.len() == 3));

        let card = catalog.get("animated-gradient-border-card").unwrap();
        assert_eq!(card.tasks.len(), 13);
    }

    #[test]
    fn test_chessboard_markup() {
        let markup = chessboard_markup();
        assert_eq!(markup.matches("<tr ").count(), 8);
        assert_eq!(markup.matches("<td ").count(), 64);
        assert!(markup.find("row-8").unwrap() < markup.find("row-1").unwrap());
        assert!(markup.contains("square-h"));
    }

    #[test]
    fn test_unknown_slug() {
        let catalog = Catalog::builtin().unwrap();
        assert!(matches!(
            catalog.get("teapot"),
            Err(Error::ChallengeNotFound(slug)) if slug == "teapot"
        ));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("boxes.json"),
            r#"{"title": "Boxes", "slug": "boxes", "markup": "<div class=\"box\"></div>",
                "tasks": [{"text": "Make it wide",
                           "requirement": {"type": "unit", "selector": ".box",
                                           "property": "width", "comparator": ">",
                                           "value": "10px"}}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut catalog = Catalog::new();
        assert_eq!(catalog.load_dir(dir.path()).unwrap(), 1);
        let boxes = catalog.get("boxes").unwrap();
        assert_eq!(boxes.starting_styles, "");
        assert_eq!(boxes.tasks.len(), 1);
    }

    #[test]
    fn test_load_dir_rejects_bad_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("bad.json"),
            r#"{"title": "Bad", "slug": "bad", "markup": "",
                "tasks": [{"text": "x", "requirement": []}]}"#,
        )
        .unwrap();
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.load_dir(dir.path()),
            Err(Error::InvalidContent(_))
        ));

        assert!(Challenge::from_json(r#"{"title": "t", "slug": "a b", "markup": ""}"#).is_err());
    }
}
