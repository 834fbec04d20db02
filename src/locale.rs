//! User-facing strings.
//!
//! The backend and its guideline corpus are Korean, so Korean is the default;
//! English is provided for development and demos.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Korean,
    English,
}

impl FromStr for Locale {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "kr" | "korean" => Ok(Locale::Korean),
            "en" | "english" => Ok(Locale::English),
            other => Err(crate::Error::configuration_with_context(
                format!("unknown locale '{}'", other),
                crate::ErrorContext::new()
                    .with_field_path("locale")
                    .with_details("expected one of: ko, en"),
            )),
        }
    }
}

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::Korean => &KOREAN,
            Locale::English => &ENGLISH,
        }
    }
}

/// Fixed strings for one locale.
#[derive(Debug)]
pub struct Strings {
    pub greeting: &'static str,
    /// Shown in place of an answer whenever a chat request fails.
    pub apology: &'static str,
    pub user_label: &'static str,
    pub assistant_label: &'static str,
    pub prediction_title: &'static str,
    pub nutrient_header: &'static str,
    pub amount_header: &'static str,
    pub references_title: &'static str,
    pub select_file: &'static str,
    pub unsupported_file_type: &'static str,
    pub upload_succeeded: &'static str,
    pub upload_failed: &'static str,
    pub list_failed: &'static str,
    pub content_failed: &'static str,
    /// `{}` is replaced by the filename.
    pub delete_succeeded: &'static str,
    pub delete_failed: &'static str,
    /// `{}` is replaced by the filename.
    pub delete_confirm: &'static str,
    pub no_guidelines: &'static str,
    pub waiting: &'static str,
    pub disclaimer: &'static str,
}

impl Strings {
    pub fn delete_succeeded_for(&self, filename: &str) -> String {
        self.delete_succeeded.replace("{}", filename)
    }

    pub fn delete_confirm_for(&self, filename: &str) -> String {
        self.delete_confirm.replace("{}", filename)
    }
}

static KOREAN: Strings = Strings {
    greeting: "검색을 원하는 문서를 먼저 업로드 해주신 후에 이용해 주시기 바랍니다.",
    apology: "죄송합니다. 요청을 처리하는 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.",
    user_label: "사용자",
    assistant_label: "Response",
    prediction_title: "Recommended TPN",
    nutrient_header: "영양소",
    amount_header: "공급량",
    references_title: "참고 진료 지침",
    select_file: "파일을 선택해 주세요.",
    unsupported_file_type: "지원되는 파일 형식: .txt, .md, .markdown, .pdf",
    upload_succeeded: "진료 지침이 성공적으로 업로드되었습니다.",
    upload_failed: "파일 업로드 중 오류가 발생했습니다.",
    list_failed: "진료 지침을 불러올 수 없습니다.",
    content_failed: "진료 지침 내용을 불러올 수 없습니다.",
    delete_succeeded: "\"{}\" 지침이 삭제되었습니다.",
    delete_failed: "지침 삭제 중 오류가 발생했습니다.",
    delete_confirm: "\"{}\" 지침을 삭제하시겠습니까?",
    no_guidelines: "업로드된 진료 지침이 없습니다.",
    waiting: "전송 중...",
    disclaimer: "Medvise는 언제나 실수를 할 수 있습니다.",
};

static ENGLISH: Strings = Strings {
    greeting: "Please upload the documents you want to search before asking questions.",
    apology: "Sorry, something went wrong while processing your request. Please try again shortly.",
    user_label: "You",
    assistant_label: "Response",
    prediction_title: "Recommended TPN",
    nutrient_header: "Nutrient",
    amount_header: "Amount",
    references_title: "Referenced guidelines",
    select_file: "Please select a file.",
    unsupported_file_type: "Supported file types: .txt, .md, .markdown, .pdf",
    upload_succeeded: "Guideline uploaded successfully.",
    upload_failed: "An error occurred while uploading the file.",
    list_failed: "Could not load guidelines.",
    content_failed: "Could not load the guideline content.",
    delete_succeeded: "\"{}\" was deleted.",
    delete_failed: "An error occurred while deleting the guideline.",
    delete_confirm: "Delete guideline \"{}\"?",
    no_guidelines: "No guidelines uploaded yet.",
    waiting: "Sending...",
    disclaimer: "Medvise can make mistakes.",
};
