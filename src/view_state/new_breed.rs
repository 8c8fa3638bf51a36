//! New Breed Form
//!
//! Collects user input, validates it, stores the picked image locally and
//! adds the breed through the repository.

use std::path::PathBuf;
use std::sync::Arc;

use cat_breeds_lib::domain::{new_user_breed_id, Breed};
use cat_breeds_lib::images::{is_image_path, ImageStore};
use cat_breeds_lib::repository::BreedRepository;

use crate::messages::user_message;

const MIN_LIFE_YEARS: u32 = 1;
const MAX_LIFE_YEARS: u32 = 40;

/// Raw form input, as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBreedInput {
    pub name: String,
    pub origin: String,
    pub description: String,
    /// Comma separated tags
    pub temperament: String,
    pub life_span_min: String,
    pub life_span_max: String,
    pub image_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Origin,
    LifeSpan,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: Field, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl NewBreedInput {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new(Field::Name, "Name is required"));
        }
        if self.origin.trim().is_empty() {
            errors.push(FieldError::new(Field::Origin, "Origin is required"));
        }

        match self.life_span_years() {
            Err(message) => errors.push(FieldError::new(Field::LifeSpan, message)),
            Ok((min, max)) if min > max => errors.push(FieldError::new(
                Field::LifeSpan,
                "Minimum life span cannot exceed the maximum",
            )),
            Ok(_) => {}
        }

        if let Some(path) = &self.image_path {
            if !is_image_path(path) {
                errors.push(FieldError::new(Field::Image, "Pick an image file"));
            }
        }

        errors
    }

    fn life_span_years(&self) -> Result<(u32, u32), &'static str> {
        let parse = |text: &str| -> Result<u32, &'static str> {
            let years: u32 = text
                .trim()
                .parse()
                .map_err(|_| "Life span must be a number of years")?;
            if (MIN_LIFE_YEARS..=MAX_LIFE_YEARS).contains(&years) {
                Ok(years)
            } else {
                Err("Life span must be between 1 and 40 years")
            }
        };
        Ok((parse(&self.life_span_min)?, parse(&self.life_span_max)?))
    }

    /// Trimmed, non-empty tags; later case-insensitive duplicates dropped
    pub fn temperament_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.temperament.split(',').map(str::trim) {
            if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                tags.push(tag.to_string());
            }
        }
        tags
    }
}

pub struct NewBreedForm {
    repo: BreedRepository,
    images: Arc<dyn ImageStore>,
    pub input: NewBreedInput,
    errors: Vec<FieldError>,
    error_message: Option<String>,
}

impl NewBreedForm {
    pub fn new(repo: BreedRepository, images: Arc<dyn ImageStore>) -> Self {
        Self {
            repo,
            images,
            input: NewBreedInput::default(),
            errors: Vec::new(),
            error_message: None,
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: Field) -> Option<&'static str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn error_shown(&mut self) {
        self.error_message = None;
    }

    /// Validate and save. Returns the stored breed on success.
    pub async fn submit(&mut self) -> Option<Breed> {
        self.errors = self.input.validate();
        if !self.errors.is_empty() {
            return None;
        }

        let image_reference = match &self.input.image_path {
            Some(path) => match self.images.persist(path).await {
                Ok(stored) => Some(stored),
                Err(e) => {
                    log::error!("Storing image {} failed: {}", path.display(), e);
                    self.error_message = Some(user_message(&e).to_string());
                    return None;
                }
            },
            None => None,
        };

        let breed = self.build_breed(image_reference);
        match self.repo.add_breed(&breed).await {
            Ok(()) => {
                self.input = NewBreedInput::default();
                Some(breed)
            }
            Err(e) => {
                log::error!("Adding breed {} failed: {}", breed.name, e);
                self.error_message = Some(user_message(&e).to_string());
                None
            }
        }
    }

    fn build_breed(&self, image_reference: Option<String>) -> Breed {
        let input = &self.input;
        let name = input.name.trim();
        let mut breed = Breed::new(new_user_breed_id(name), name, input.origin.trim())
            .with_description(input.description.trim())
            .with_temperament(input.temperament_tags())
            .with_life_span(format!(
                "{} - {}",
                input.life_span_min.trim(),
                input.life_span_max.trim()
            ));
        breed.image_reference = image_reference;
        breed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::GENERIC_ERROR_MESSAGE;
    use crate::test_support::Fixture;
    use std::path::Path;

    fn valid_input() -> NewBreedInput {
        NewBreedInput {
            name: "  Cafe Cat ".to_string(),
            origin: "Egypt".to_string(),
            description: "Sleeps in cafes".to_string(),
            temperament: "Calm, lazy, , Calm ,Curious".to_string(),
            life_span_min: "12".to_string(),
            life_span_max: "16".to_string(),
            image_path: None,
        }
    }

    #[test]
    fn test_validation_errors() {
        let input = NewBreedInput {
            life_span_min: "20".to_string(),
            life_span_max: "ten".to_string(),
            image_path: Some(PathBuf::from("notes.txt")),
            ..NewBreedInput::default()
        };
        let fields: Vec<Field> = input.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::Name, Field::Origin, Field::LifeSpan, Field::Image]);

        let inverted = NewBreedInput {
            life_span_min: "16".to_string(),
            life_span_max: "12".to_string(),
            ..valid_input()
        };
        assert_eq!(inverted.validate().len(), 1);

        let too_long = NewBreedInput {
            life_span_max: "41".to_string(),
            ..valid_input()
        };
        assert_eq!(too_long.validate()[0].field, Field::LifeSpan);

        assert!(valid_input().validate().is_empty());
    }

    #[test]
    fn test_temperament_tags() {
        assert_eq!(valid_input().temperament_tags(), vec!["Calm", "lazy", "Curious"]);
    }

    #[tokio::test]
    async fn test_submit_with_image() {
        let fx = Fixture::new(Vec::new()).await;
        let picked = fx.scratch_file("picked.png", b"png bytes");

        let mut form = NewBreedForm::new(fx.repo.clone(), fx.images());
        form.input = NewBreedInput {
            image_path: Some(picked.clone()),
            ..valid_input()
        };

        let breed = form.submit().await.expect("submit");
        assert!(breed.is_user_created());
        assert_eq!(breed.name, "Cafe Cat");
        assert_eq!(breed.life_span, "12 - 16");
        assert_eq!(breed.temperament, vec!["Calm", "lazy", "Curious"]);

        let stored_path = breed.image_reference.clone().expect("image stored");
        assert_ne!(Path::new(&stored_path), picked.as_path());
        assert_eq!(std::fs::read(&stored_path).unwrap(), b"png bytes");
        assert_eq!(breed.image_url(), stored_path);

        let saved = fx.repo.get_breed_by_id(&breed.id).await.unwrap().unwrap();
        assert_eq!(saved, breed);
        assert_eq!(form.input, NewBreedInput::default());
    }

    #[tokio::test]
    async fn test_invalid_submit_writes_nothing() {
        let fx = Fixture::new(Vec::new()).await;
        let mut form = NewBreedForm::new(fx.repo.clone(), fx.images());
        form.input.name = "Nameless origin".to_string();

        assert!(form.submit().await.is_none());
        assert_eq!(form.error_for(Field::Origin), Some("Origin is required"));
        assert!(form.error_for(Field::Name).is_none());
        assert!(fx.repo.observe_all_breeds().next().await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_image_file_surfaces_message() {
        let fx = Fixture::new(Vec::new()).await;
        let mut form = NewBreedForm::new(fx.repo.clone(), fx.images());
        form.input = NewBreedInput {
            image_path: Some(PathBuf::from("/definitely/not/here.png")),
            ..valid_input()
        };

        assert!(form.submit().await.is_none());
        assert_eq!(form.error_message(), Some(GENERIC_ERROR_MESSAGE));
        form.error_shown();
        assert!(form.error_message().is_none());
    }
}
