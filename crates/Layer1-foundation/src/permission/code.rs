//! 권한 코드 검증

use regex::Regex;
use std::sync::OnceLock;

use crate::{Error, Result};

/// 코드 최소/최대 길이 (permission 테이블 컬럼 제약과 동일)
pub const CODE_MIN_LEN: usize = 2;
pub const CODE_MAX_LEN: usize = 100;

static CODE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn code_pattern() -> &'static Regex {
    CODE_PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9:_-]+$").expect("static code pattern"))
}

/// 코드 형식 확인
pub fn is_valid_code(code: &str) -> bool {
    let len = code.chars().count();
    (CODE_MIN_LEN..=CODE_MAX_LEN).contains(&len) && code_pattern().is_match(code)
}

/// 코드 검증 (실패 시 Validation 에러)
pub fn validate_code(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(Error::Validation("permission code is blank".to_string()));
    }
    if !is_valid_code(code) {
        return Err(Error::Validation(format!(
            "permission code '{}' must be {}-{} characters of [a-zA-Z0-9:_-]",
            code, CODE_MIN_LEN, CODE_MAX_LEN
        )));
    }
    Ok(())
}
