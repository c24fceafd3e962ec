//! Interactive setup wizard.
//!
//! Asks for the search criteria and output settings, starting from the
//! currently resolved values, and returns the answers as the
//! highest-priority [`ConfigLayer`].

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect};

use super::{Config, ConfigError, ConfigLayer};
use crate::models::SearchField;
use crate::output::OutputFormat;

const SEARCH_FIELDS: [SearchField; 3] = [SearchField::Title, SearchField::Abstract, SearchField::All];

/// Split a space-separated answer into its words.
pub fn split_words(answer: &str) -> Vec<String> {
    answer.split_whitespace().map(str::to_string).collect()
}

/// Split a comma-separated answer, trimming each entry.
///
/// Keywords may contain spaces ("large language model"), so they are
/// entered comma separated.
pub fn split_list(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Checkbox defaults for `items` given the currently selected ones.
fn checked<T: PartialEq>(items: &[T], selected: &[T]) -> Vec<bool> {
    items.iter().map(|item| selected.contains(item)).collect()
}

fn picked<T: Copy>(items: &[T], indices: Vec<usize>) -> Vec<T> {
    indices.into_iter().filter_map(|i| items.get(i).copied()).collect()
}

/// Run the wizard on the terminal.
pub fn run_wizard(current: &Config) -> Result<ConfigLayer, ConfigError> {
    let theme = ColorfulTheme::default();

    let categories: String = Input::with_theme(&theme)
        .with_prompt("arXiv categories, space separated (e.g. cs.CL cs.LG)")
        .with_initial_text(current.categories.join(" "))
        .allow_empty(true)
        .interact_text()?;

    let keywords: String = Input::with_theme(&theme)
        .with_prompt("Keywords, comma separated")
        .with_initial_text(current.keywords.join(", "))
        .allow_empty(true)
        .interact_text()?;

    let fields = MultiSelect::with_theme(&theme)
        .with_prompt("Match keywords in")
        .items(&SEARCH_FIELDS)
        .defaults(&checked(&SEARCH_FIELDS, &current.keyword_fields))
        .interact()?;

    let max_results: usize = Input::with_theme(&theme)
        .with_prompt("Maximum number of papers to fetch")
        .default(current.max_results)
        .validate_with(|n: &usize| {
            if *n > 0 {
                Ok(())
            } else {
                Err("must be a positive integer")
            }
        })
        .interact_text()?;

    let formats = MultiSelect::with_theme(&theme)
        .with_prompt("Output formats")
        .items(&OutputFormat::ALL)
        .defaults(&checked(&OutputFormat::ALL, &current.output_formats))
        .interact()?;

    let mut output_formats = picked(&OutputFormat::ALL, formats);
    if output_formats.is_empty() {
        output_formats.push(OutputFormat::Console);
    }

    let silent = Confirm::with_theme(&theme)
        .with_prompt("Silent mode (only errors and a one-line summary)?")
        .default(current.silent)
        .interact()?;

    Ok(wizard_layer(WizardAnswers {
        categories,
        keywords,
        fields: picked(&SEARCH_FIELDS, fields),
        max_results,
        output_formats,
        silent,
    }))
}

/// Raw answers collected by [`run_wizard`]
struct WizardAnswers {
    categories: String,
    keywords: String,
    fields: Vec<SearchField>,
    max_results: usize,
    output_formats: Vec<OutputFormat>,
    silent: bool,
}

fn wizard_layer(answers: WizardAnswers) -> ConfigLayer {
    ConfigLayer {
        categories: Some(split_words(&answers.categories)),
        keywords: Some(split_list(&answers.keywords)),
        keyword_fields: Some(answers.fields),
        max_results: Some(answers.max_results),
        output_formats: Some(answers.output_formats),
        silent: Some(answers.silent),
        ..Default::default()
    }
}
