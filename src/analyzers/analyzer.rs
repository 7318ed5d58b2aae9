use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::analyzers::frequency::{display_descending, frequency_table};
use crate::analyzers::grouped::{grouped_average, top_group};
use crate::analyzers::types::{
    AnalysisReport, AverageSection, FrequencyEntry, FrequencySection, PlatformReport,
};
use crate::analyzers::utility::NumericFormat;
use crate::cleaner::{CleanedDataset, clean};
use crate::error::AnalysisError;
use crate::loader::load_dataset;
use crate::schema::{Platform, Role};
use crate::settings::Settings;

/// Columns summarized as frequency tables for each platform.
fn frequency_roles(platform: Platform) -> &'static [Role] {
    match platform {
        Platform::GooglePlay => &[Role::Category, Role::Genre, Role::Installs],
        Platform::AppStore => &[Role::Genre],
    }
}

/// (group column, value column, value format) pairs averaged for each platform.
fn average_plans(platform: Platform) -> &'static [(Role, Role, NumericFormat)] {
    match platform {
        Platform::GooglePlay => &[(Role::Category, Role::Installs, NumericFormat::Installs)],
        Platform::AppStore => &[(Role::Genre, Role::RatingCount, NumericFormat::Plain)],
    }
}

/// Sorted frequency table of the column bound to `role`.
pub fn frequency_section(
    cleaned: &CleanedDataset,
    role: Role,
) -> Result<FrequencySection, AnalysisError> {
    let index = cleaned.schema.index(role)?;
    let table = frequency_table(&cleaned.rows, index);

    Ok(FrequencySection {
        role,
        entries: display_descending(&table)
            .into_iter()
            .map(FrequencyEntry::from)
            .collect(),
    })
}

/// Grouped averages of `value_role` per distinct `group_role`.
pub fn average_section(
    cleaned: &CleanedDataset,
    group_role: Role,
    value_role: Role,
    format: NumericFormat,
) -> Result<AverageSection, AnalysisError> {
    let groups = grouped_average(
        &cleaned.rows,
        cleaned.schema.index(group_role)?,
        cleaned.schema.index(value_role)?,
        format,
    )?;
    let top = top_group(&groups).cloned();

    Ok(AverageSection {
        group_role,
        value_role,
        groups,
        top,
    })
}

/// Computes every frequency table and grouped average for a cleaned dataset.
pub fn analyze_platform(cleaned: &CleanedDataset) -> Result<PlatformReport, AnalysisError> {
    let platform = cleaned.report.platform;

    let frequencies = frequency_roles(platform)
        .iter()
        .map(|role| frequency_section(cleaned, *role))
        .collect::<Result<Vec<_>, _>>()?;

    let averages = average_plans(platform)
        .iter()
        .map(|(group, value, format)| average_section(cleaned, *group, *value, *format))
        .collect::<Result<Vec<_>, _>>()?;

    for section in &averages {
        if let Some(top) = &section.top {
            info!(
                platform = %platform,
                group_by = %section.group_role,
                value = %section.value_role,
                top_group = %top.group,
                mean = top.mean,
                "Highest group average"
            );
        }
    }

    Ok(PlatformReport {
        platform,
        cleaning: cleaned.report.clone(),
        frequencies,
        averages,
    })
}

/// Loads and cleans one platform's export.
pub fn load_and_clean(
    platform: Platform,
    path: &Path,
    settings: &Settings,
) -> Result<CleanedDataset, AnalysisError> {
    let dataset = load_dataset(path)?;
    clean(
        &dataset,
        &settings.profile(platform),
        settings.non_ascii_threshold,
    )
}

/// Runs the full pipeline over each `(platform, path)` input.
#[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
pub fn analyze(
    inputs: &[(Platform, &Path)],
    settings: &Settings,
) -> Result<AnalysisReport, AnalysisError> {
    let mut platforms = Vec::with_capacity(inputs.len());

    for (platform, path) in inputs {
        let cleaned = load_and_clean(*platform, path, settings)?;
        platforms.push(analyze_platform(&cleaned)?);
    }

    info!(platforms = platforms.len(), "Analysis complete");

    Ok(AnalysisReport {
        generated_at: Utc::now(),
        platforms,
    })
}
