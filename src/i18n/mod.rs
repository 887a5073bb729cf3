use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// UI language. The site ships in Russian; English is available for tests and demos.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    /// Parse a language tag such as `ru`, `en-US` or `EN`; unknown tags fall back to the default.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or_default();
        primary.parse().unwrap_or_default()
    }

    pub fn search_placeholder(self) -> &'static str {
        match self {
            Locale::Ru => "Начните вводить имя или email",
            Locale::En => "Start typing a name or email",
        }
    }

    pub fn no_results(self) -> &'static str {
        match self {
            Locale::Ru => "Пользователи не найдены",
            Locale::En => "Users not found",
        }
    }

    pub fn searching(self) -> &'static str {
        match self {
            Locale::Ru => "Поиск…",
            Locale::En => "Searching…",
        }
    }

    pub fn loading_more(self) -> &'static str {
        match self {
            Locale::Ru => "Загрузка результатов…",
            Locale::En => "Loading more results…",
        }
    }

    pub fn table_cell(self, row: u32, col: u32) -> String {
        match self {
            Locale::Ru => format!("Ячейка {row}, {col}"),
            Locale::En => format!("Cell {row}, {col}"),
        }
    }

    pub fn upload_success(self) -> &'static str {
        match self {
            Locale::Ru => "PDF успешно загружен!",
            Locale::En => "PDF uploaded successfully!",
        }
    }

    pub fn upload_failed(self) -> &'static str {
        match self {
            Locale::Ru => "Ошибка при загрузке PDF. Пожалуйста, попробуйте снова.",
            Locale::En => "PDF upload failed. Please try again.",
        }
    }

    pub fn request_failed(self) -> &'static str {
        match self {
            Locale::Ru => "Произошла ошибка при отправке запроса.",
            Locale::En => "An error occurred while sending the request.",
        }
    }

    pub fn title_placeholder(self) -> &'static str {
        match self {
            Locale::Ru => "Название документа",
            Locale::En => "Document title",
        }
    }

    pub fn rows_label(self) -> &'static str {
        match self {
            Locale::Ru => "Строки",
            Locale::En => "Rows",
        }
    }

    pub fn cols_label(self) -> &'static str {
        match self {
            Locale::Ru => "Столбцы",
            Locale::En => "Columns",
        }
    }

    pub fn insert_table(self) -> &'static str {
        match self {
            Locale::Ru => "Вставить таблицу",
            Locale::En => "Insert table",
        }
    }

    pub fn upload(self) -> &'static str {
        match self {
            Locale::Ru => "Сохранить как PDF",
            Locale::En => "Save as PDF",
        }
    }

    pub fn uploading(self) -> &'static str {
        match self {
            Locale::Ru => "Загрузка…",
            Locale::En => "Uploading…",
        }
    }

    pub fn preview(self) -> &'static str {
        match self {
            Locale::Ru => "Предпросмотр",
            Locale::En => "Preview",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("en"), Locale::En);
        assert_eq!(Locale::from_tag("EN-us"), Locale::En);
        assert_eq!(Locale::from_tag("ru_RU"), Locale::Ru);
        assert_eq!(Locale::from_tag("de"), Locale::Ru);
        assert_eq!(Locale::from_tag(""), Locale::Ru);
    }

    #[test]
    fn test_table_cell_is_one_indexed_text() {
        assert_eq!(Locale::En.table_cell(1, 2), "Cell 1, 2");
        assert_eq!(Locale::Ru.table_cell(3, 1), "Ячейка 3, 1");
    }

    #[test]
    fn test_display_matches_tag() {
        assert_eq!(Locale::En.to_string(), "en");
        assert_eq!(Locale::Ru.as_ref(), "ru");
    }
}
