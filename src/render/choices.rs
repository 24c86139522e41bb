use crate::repository::NoteRepository;

/// Selectable link endpoints, one list per side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointChoices {
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

impl EndpointChoices {
    /// Rebuild both lists from the current titles, in repository order.
    pub fn populate(notes: &NoteRepository) -> Self {
        let titles: Vec<String> = notes.titles().map(str::to_string).collect();
        Self {
            sources: titles.clone(),
            targets: titles,
        }
    }

    pub fn is_source(&self, title: &str) -> bool {
        self.sources.iter().any(|t| t == title)
    }

    pub fn is_target(&self, title: &str) -> bool {
        self.targets.iter().any(|t| t == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Note;

    #[test]
    fn test_populate_mirrors_titles_in_order() {
        let mut repo = NoteRepository::new();
        repo.upsert("B".to_string(), Note::new(String::new(), vec![]));
        repo.upsert("A".to_string(), Note::new(String::new(), vec![]));

        let choices = EndpointChoices::populate(&repo);
        assert_eq!(choices.sources, vec!["B", "A"]);
        assert_eq!(choices.targets, choices.sources);
        assert!(choices.is_source("A"));
        assert!(!choices.is_target("C"));
    }

    #[test]
    fn test_populate_empty_repository() {
        let choices = EndpointChoices::populate(&NoteRepository::new());
        assert!(choices.sources.is_empty());
        assert!(choices.targets.is_empty());
    }
}
