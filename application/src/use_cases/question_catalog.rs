//! Question pool inventory

use super::error::InterviewError;
use crate::ports::repository::InterviewRepository;
use interview_domain::{Difficulty, QuestionFilter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Number of questions available for one topic and difficulty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolCount {
    pub topic: String,
    pub difficulty: Difficulty,
    pub count: usize,
}

pub struct QuestionCatalogUseCase {
    repository: Arc<dyn InterviewRepository>,
}

impl QuestionCatalogUseCase {
    pub fn new(repository: Arc<dyn InterviewRepository>) -> Self {
        Self { repository }
    }

    /// Pool sizes grouped by topic then difficulty, optionally narrowed by `filter`.
    pub async fn pool_counts(&self, filter: &QuestionFilter) -> Result<Vec<PoolCount>, InterviewError> {
        let questions = self.repository.list_questions(filter).await?;

        let mut counts: BTreeMap<(String, u8), (Difficulty, usize)> = BTreeMap::new();
        for q in &questions {
            let rank = Difficulty::all()
                .iter()
                .position(|d| *d == q.difficulty)
                .unwrap_or_default() as u8;
            counts
                .entry((q.topic.clone(), rank))
                .or_insert((q.difficulty, 0))
                .1 += 1;
        }

        Ok(counts
            .into_iter()
            .map(|((topic, _), (difficulty, count))| PoolCount {
                topic,
                difficulty,
                count,
            })
            .collect())
    }

    /// Number of questions matching `filter`.
    pub async fn count(&self, filter: &QuestionFilter) -> Result<usize, InterviewError> {
        Ok(self.repository.count_questions(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryRepository, sample_questions};
    use interview_domain::Question;

    fn catalog() -> QuestionCatalogUseCase {
        let mut questions = sample_questions();
        questions.push(Question::new(7, "Databases", Difficulty::Senior, "What is MVCC?", "Versioned rows."));
        QuestionCatalogUseCase::new(Arc::new(MemoryRepository::with_questions(questions)))
    }

    #[tokio::test]
    async fn test_pool_counts_grouped_and_ordered() {
        let counts = catalog().pool_counts(&QuestionFilter::default()).await.unwrap();
        assert_eq!(
            counts,
            vec![
                PoolCount {
                    topic: "Databases".to_string(),
                    difficulty: Difficulty::Junior,
                    count: 3
                },
                PoolCount {
                    topic: "Databases".to_string(),
                    difficulty: Difficulty::Senior,
                    count: 1
                },
                PoolCount {
                    topic: "Stacks & Queues".to_string(),
                    difficulty: Difficulty::Junior,
                    count: 3
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_count_with_filter() {
        let filter = QuestionFilter {
            difficulty: Some(Difficulty::Junior),
            topic: Some("Databases".to_string()),
        };
        assert_eq!(catalog().count(&filter).await.unwrap(), 3);
        assert_eq!(catalog().count(&QuestionFilter::default()).await.unwrap(), 7);
    }
}
