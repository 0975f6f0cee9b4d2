//! # Phone Mask
//!
//! Brazilian numbers, area code plus subscriber number.
//!
//! - Fixed line, 10 digits: `(XX) XXXX-XXXX`
//! - Mobile, 11 digits: `(XX) XXXXX-XXXX`
//!
//! Input is masked as it is typed, so partial numbers are formatted as far
//! as they go instead of being rejected.

pub const MAX_DIGITS: usize = 11;

const AREA_CODE_DIGITS: usize = 2;
const FIXED_LINE_DIGITS: usize = 10;

pub fn mask_phone(input: &str) -> String {
    let digits: String = unmask_phone(input).chars().take(MAX_DIGITS).collect();

    if digits.len() <= AREA_CODE_DIGITS {
        return digits;
    }

    let (area, number) = digits.split_at(AREA_CODE_DIGITS);

    // 4 digits before the hyphen for fixed lines, 5 for mobiles
    let split = if digits.len() <= FIXED_LINE_DIGITS { 4 } else { 5 };

    if number.len() <= split {
        return format!("({area}) {number}");
    }

    let (prefix, suffix) = number.split_at(split);
    format!("({area}) {prefix}-{suffix}")
}

pub fn unmask_phone(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::{mask_phone, unmask_phone};

    #[test]
    fn test_fixed_line() {
        assert_eq!(mask_phone("1133334444"), "(11) 3333-4444");
        assert_eq!(mask_phone("(11) 3333-4444"), "(11) 3333-4444");
    }

    #[test]
    fn test_mobile() {
        assert_eq!(mask_phone("11987654321"), "(11) 98765-4321");
    }

    #[test]
    fn test_truncates_extra_digits() {
        assert_eq!(mask_phone("119876543219999"), "(11) 98765-4321");
    }

    #[test]
    fn test_partial_input() {
        assert_eq!(mask_phone(""), "");
        assert_eq!(mask_phone("1"), "1");
        assert_eq!(mask_phone("11"), "11");
        assert_eq!(mask_phone("119"), "(11) 9");
        assert_eq!(mask_phone("113333"), "(11) 3333");
        assert_eq!(mask_phone("1133334"), "(11) 3333-4");
    }

    #[test]
    fn test_ignores_non_digits() {
        assert_eq!(mask_phone("abc11x9876-5432 1"), "(11) 98765-4321");
    }

    #[test]
    fn test_unmask_restores_digits() {
        for input in ["", "1", "119", "1133334444", "11987654321", "1198765432100"] {
            let expected: String = input.chars().take(super::MAX_DIGITS).collect();
            assert_eq!(unmask_phone(&mask_phone(input)), expected);
        }
    }

    #[test]
    fn test_unmask_strips_everything_else() {
        assert_eq!(unmask_phone("+55 (11) 98765-4321"), "5511987654321");
        assert_eq!(unmask_phone("no digits"), "");
    }
}
