use clap::Args;
use lq_core::catalog;

use super::{CatalogEntry, Outcome};

#[derive(Args)]
pub struct CatalogArgs {
    /// Profession to resolve; omit to list the known professions
    pub profession: Option<String>,
}

pub fn handle(args: CatalogArgs) -> Outcome {
    match args.profession {
        Some(profession) => Outcome::Catalog(CatalogEntry {
            skills: catalog::lookup(&profession),
            profession,
        }),
        None => Outcome::Professions(catalog::professions().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_professions_without_argument() {
        match handle(CatalogArgs { profession: None }) {
            Outcome::Professions(names) => assert!(names.contains(&"web developer")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn resolves_profession_through_lookup() {
        let outcome = handle(CatalogArgs {
            profession: Some("Senior Web Developer".to_string()),
        });
        match outcome {
            Outcome::Catalog(entry) => assert_eq!(entry.skills[0].name, "HTML Fundamentals"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
