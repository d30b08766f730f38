use std::error::Error;
use std::process::ExitCode;

use varsync_application::SaveSettings;
use varsync_domain::{Rgba, Settings};
use varsync_infrastructure::to_json_stable;

use crate::cli::{SettingsArgs, SettingsCommand};
use crate::context::Context;

pub async fn run(ctx: &Context, command: &SettingsCommand) -> Result<ExitCode, Box<dyn Error>> {
    match command {
        SettingsCommand::Show => {
            let settings = ctx.settings().await?;
            print!("{}", to_json_stable(&settings)?);
        }
        SettingsCommand::Set(args) => {
            let mut settings = ctx.settings().await?;
            apply(&mut settings, args);
            if !Rgba::is_valid(&settings.color_fallback) {
                eprintln!("error: '{}' is not a valid color", settings.color_fallback);
                return Ok(ExitCode::FAILURE);
            }
            SaveSettings::new(ctx.client_storage()).execute(&settings).await?;
            print!("{}", to_json_stable(&settings)?);
        }
        SettingsCommand::Reset => {
            SaveSettings::new(ctx.client_storage()).reset().await?;
            print!("{}", to_json_stable(&Settings::default())?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn apply(settings: &mut Settings, args: &SettingsArgs) {
    if let Some(value) = args.fail_on_null_alias {
        settings.fail_on_null_alias = value;
    }
    if let Some(value) = args.number_fallback {
        settings.number_fallback = value;
    }
    if let Some(value) = args.boolean_fallback {
        settings.boolean_fallback = value;
    }
    if let Some(value) = &args.string_fallback {
        settings.string_fallback.clone_from(value);
    }
    if let Some(value) = &args.color_fallback {
        settings.color_fallback.clone_from(value);
    }
    if let Some(value) = args.extend_existing_collections {
        settings.extend_existing_collections = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_omitted_fields() {
        let mut settings = Settings::default();
        let args = SettingsArgs {
            fail_on_null_alias: Some(false),
            number_fallback: None,
            boolean_fallback: None,
            string_fallback: Some("n/a".to_string()),
            color_fallback: None,
            extend_existing_collections: None,
        };

        apply(&mut settings, &args);

        assert!(!settings.fail_on_null_alias);
        assert_eq!(settings.string_fallback, "n/a");
        assert_eq!(settings.color_fallback, Settings::default().color_fallback);
        assert!(settings.extend_existing_collections);
    }
}
