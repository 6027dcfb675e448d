use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::HashSet;

use quiz_core::Catalog;
use quiz_core::model::{Direction, IdiomEntry, Mode, Question, QuestionError, UserProgress};

/// Upper bound on incorrect choices offered alongside the correct answer.
pub const MAX_DISTRACTORS: usize = 3;

/// Entries of a category that qualify for the given mode.
pub(crate) fn eligible_entries<'a>(
    entries: &'a [IdiomEntry],
    progress: &UserProgress,
    mode: Mode,
) -> Vec<&'a IdiomEntry> {
    entries
        .iter()
        .filter(|entry| match mode {
            Mode::Study => progress.is_study_eligible(entry.id()),
            Mode::Review => progress.is_review_eligible(entry.id()),
        })
        .collect()
}

/// Picks the prompt-opposite field used for the choice set.
fn answer_text(entry: &IdiomEntry, direction: Direction) -> &str {
    match direction {
        Direction::Forward => entry.meaning(),
        Direction::Reverse => entry.phrase(),
    }
}

/// Flips a fair coin between the two quiz directions.
pub(crate) fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    if rng.random() {
        Direction::Forward
    } else {
        Direction::Reverse
    }
}

/// Generates one multiple-choice question for the user.
///
/// The answer key is picked uniformly from the mode's eligibility pool;
/// distractors are sampled without replacement from the *full* category (not
/// the filtered pool), excluding the picked entry and deduplicating on the
/// choice value so the aggregate `"all"` category's phrase duplicates can
/// never repeat an option. A category with fewer than `MAX_DISTRACTORS`
/// other entries simply yields a smaller choice set.
///
/// Returns `Ok(None)` when the eligibility pool is empty — the normal
/// "nothing left to study/review" terminal state.
///
/// # Errors
///
/// Returns `QuestionError` if the assembled choice set fails validation.
pub fn generate<R: Rng + ?Sized>(
    catalog: &Catalog,
    progress: &UserProgress,
    category_key: &str,
    mode: Mode,
    direction: Direction,
    rng: &mut R,
) -> Result<Option<Question>, QuestionError> {
    let entries = catalog.entries_for(category_key);
    let pool = eligible_entries(entries, progress, mode);
    let Some(chosen) = pool.choose(rng).copied() else {
        return Ok(None);
    };

    let correct_value = answer_text(chosen, direction).to_owned();

    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(correct_value.as_str());
    let mut others: Vec<&IdiomEntry> = Vec::new();
    for entry in entries {
        if entry.id() == chosen.id() {
            continue;
        }
        if seen.insert(answer_text(entry, direction)) {
            others.push(entry);
        }
    }

    let mut choices: Vec<String> = others
        .choose_multiple(rng, MAX_DISTRACTORS)
        .map(|entry| answer_text(entry, direction).to_owned())
        .collect();
    choices.push(correct_value.clone());
    choices.shuffle(rng);

    let prompt = match direction {
        Direction::Forward => chosen.phrase(),
        Direction::Reverse => chosen.meaning(),
    };

    let question = Question::new(
        category_key,
        chosen,
        mode,
        direction,
        prompt,
        choices,
        correct_value,
    )?;
    Ok(Some(question))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::catalog::{ALL_CATEGORY_KEY, CategorySource};
    use quiz_core::model::{EntryDraft, EntryId};
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn draft(phrase: &str, meaning: &str) -> EntryDraft {
        EntryDraft::new(phrase, meaning, Some(format!("Example for {phrase}.")))
    }

    fn sample_catalog() -> Catalog {
        let sources = vec![
            CategorySource::new(
                "quick",
                "Quick",
                vec![
                    draft("piece of cake", "проще простого"),
                    draft("call it a day", "закончить работу"),
                    draft("hit the sack", "лечь спать"),
                    draft("break the ice", "начать разговор"),
                ],
            ),
            CategorySource::new(
                "tiny",
                "Tiny",
                vec![
                    draft("miss the boat", "упустить шанс"),
                    draft("under the weather", "неважно себя чувствовать"),
                ],
            ),
        ];
        Catalog::load(sources, "All").unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn forward_question_offers_meanings() {
        let catalog = sample_catalog();
        let progress = UserProgress::new();
        let question = generate(
            &catalog,
            &progress,
            "quick",
            Mode::Study,
            Direction::Forward,
            &mut rng(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(question.choice_count(), 4);
        let entry = catalog
            .entries_for("quick")
            .iter()
            .find(|e| e.phrase() == question.prompt())
            .unwrap();
        assert_eq!(question.correct_value(), entry.meaning());
        // every choice is a meaning text from the category
        for choice in question.choices() {
            assert!(
                catalog
                    .entries_for("quick")
                    .iter()
                    .any(|e| e.meaning() == choice)
            );
        }
    }

    #[test]
    fn reverse_question_offers_phrases() {
        let catalog = sample_catalog();
        let progress = UserProgress::new();
        let question = generate(
            &catalog,
            &progress,
            "quick",
            Mode::Study,
            Direction::Reverse,
            &mut rng(),
        )
        .unwrap()
        .unwrap();

        for choice in question.choices() {
            assert!(
                catalog
                    .entries_for("quick")
                    .iter()
                    .any(|e| e.phrase() == choice)
            );
        }
    }

    #[test]
    fn correct_value_appears_exactly_once() {
        let catalog = sample_catalog();
        let progress = UserProgress::new();

        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = generate(
                &catalog,
                &progress,
                ALL_CATEGORY_KEY,
                Mode::Study,
                Direction::Forward,
                &mut rng,
            )
            .unwrap()
            .unwrap();

            let hits = question
                .choices()
                .iter()
                .filter(|c| c.as_str() == question.correct_value())
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn two_entry_category_yields_two_choices() {
        let catalog = sample_catalog();
        let progress = UserProgress::new();
        let question = generate(
            &catalog,
            &progress,
            "tiny",
            Mode::Study,
            Direction::Forward,
            &mut rng(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(question.choice_count(), 2);
    }

    #[test]
    fn review_pool_is_empty_for_new_user() {
        let catalog = sample_catalog();
        let progress = UserProgress::new();
        let question = generate(
            &catalog,
            &progress,
            "quick",
            Mode::Review,
            Direction::Forward,
            &mut rng(),
        )
        .unwrap();

        assert!(question.is_none());
    }

    #[test]
    fn studied_entries_leave_the_study_pool() {
        let catalog = sample_catalog();
        let mut progress = UserProgress::new();
        for entry in catalog.entries_for("tiny") {
            progress.record_answer(entry.id(), "tiny", Mode::Study, true, fixed_now());
        }

        let question = generate(
            &catalog,
            &progress,
            "tiny",
            Mode::Study,
            Direction::Forward,
            &mut rng(),
        )
        .unwrap();
        assert!(question.is_none());

        // a mistake puts the entry back in the pool
        let slipped = EntryId::from_phrase("miss the boat");
        progress.record_answer(&slipped, "tiny", Mode::Review, false, fixed_now());
        let question = generate(
            &catalog,
            &progress,
            "tiny",
            Mode::Study,
            Direction::Forward,
            &mut rng(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(question.entry_id(), &slipped);
    }

    #[test]
    fn distractors_come_from_full_category_not_pool() {
        let catalog = sample_catalog();
        let mut progress = UserProgress::new();
        // master everything except one entry, leaving a one-entry study pool
        for entry in catalog.entries_for("quick") {
            if entry.phrase() != "piece of cake" {
                progress.record_answer(entry.id(), "quick", Mode::Study, true, fixed_now());
            }
        }

        let question = generate(
            &catalog,
            &progress,
            "quick",
            Mode::Study,
            Direction::Forward,
            &mut rng(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(question.entry_id(), &EntryId::from_phrase("piece of cake"));
        assert_eq!(question.choice_count(), 4);
    }

    #[test]
    fn duplicate_phrase_across_categories_never_repeats_a_choice() {
        let sources = vec![
            CategorySource::new(
                "business",
                "Business",
                vec![
                    draft("break the ice", "начать разговор"),
                    draft("think outside the box", "мыслить нестандартно"),
                ],
            ),
            CategorySource::new(
                "everyday",
                "Everyday",
                vec![
                    draft("break the ice", "начать разговор"),
                    draft("hit the sack", "лечь спать"),
                ],
            ),
        ];
        let catalog = Catalog::load(sources, "All").unwrap();
        let progress = UserProgress::new();

        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = generate(
                &catalog,
                &progress,
                ALL_CATEGORY_KEY,
                Mode::Study,
                Direction::Reverse,
                &mut rng,
            )
            .unwrap()
            .unwrap();

            let mut values: Vec<&str> = question.choices().iter().map(String::as_str).collect();
            values.sort_unstable();
            values.dedup();
            assert_eq!(values.len(), question.choice_count());
        }
    }

    #[test]
    fn explanation_carries_the_entry_example() {
        let catalog = sample_catalog();
        let progress = UserProgress::new();
        let question = generate(
            &catalog,
            &progress,
            "tiny",
            Mode::Study,
            Direction::Forward,
            &mut rng(),
        )
        .unwrap()
        .unwrap();

        let example = question.explanation().unwrap();
        assert!(example.starts_with("Example for"));
    }

    #[test]
    fn equal_seeds_generate_equal_questions() {
        let catalog = sample_catalog();
        let progress = UserProgress::new();

        let a = generate(
            &catalog,
            &progress,
            "quick",
            Mode::Study,
            Direction::Forward,
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();
        let b = generate(
            &catalog,
            &progress,
            "quick",
            Mode::Study,
            Direction::Forward,
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();

        assert_eq!(a, b);
    }
}
