use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(spec) = std::env::var("OLOGSTYLE_SPEC")
            && !spec.is_empty()
        {
            self.spec.path = Some(spec);
        }

        if let Ok(intent) = std::env::var("OLOGSTYLE_INTENTIONALITY")
            && !intent.is_empty()
        {
            self.spec.intentionality = Some(intent);
        }

        if let Ok(level) = std::env::var("OLOGSTYLE_LOG_LEVEL")
            && !level.is_empty()
        {
            self.logging.level = level;
        }

        if let Ok(strict) = std::env::var("OLOGSTYLE_STRICT")
            && let Ok(strict) = strict.trim().parse::<bool>()
        {
            self.engine.strict = strict;
        }
    }
}
