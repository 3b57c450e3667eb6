//! Input masks and check-digit validation for Brazilian identifiers.

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Applies `groups` with the given separators when `value` carries exactly
/// the expected digit count. Anything else is returned as typed, except that
/// over-long input is left untouched.
fn mask(value: &str, groups: &[usize], separators: &[&str]) -> String {
    let numbers = digits(value);
    let expected: usize = groups.iter().sum();
    if numbers.len() != expected {
        return value.to_string();
    }
    let mut out = String::new();
    let mut start = 0;
    for (idx, len) in groups.iter().enumerate() {
        if let Some(prefix) = separators.get(idx) {
            out.push_str(prefix);
        }
        out.push_str(&numbers[start..start + len]);
        start += len;
    }
    if let Some(suffix) = separators.get(groups.len()) {
        out.push_str(suffix);
    }
    out
}

/// `11999999999` → `(11) 99999-9999`.
pub fn format_phone(value: &str) -> String {
    mask(value, &[2, 5, 4], &["(", ") ", "-"])
}

/// `52998224725` → `529.982.247-25`.
pub fn format_cpf(value: &str) -> String {
    mask(value, &[3, 3, 3, 2], &["", ".", ".", "-"])
}

/// `11222333000181` → `11.222.333/0001-81`.
pub fn format_cnpj(value: &str) -> String {
    mask(value, &[2, 3, 3, 4, 2], &["", ".", ".", "/", "-"])
}

fn all_same(numbers: &[u32]) -> bool {
    numbers.windows(2).all(|pair| pair[0] == pair[1])
}

fn to_digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Verifies both CPF check digits.
pub fn validate_cpf(value: &str) -> bool {
    let numbers = to_digits(value);
    if numbers.len() != 11 || all_same(&numbers) {
        return false;
    }
    let check = |len: usize| -> u32 {
        let sum: u32 = numbers[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        let digit = 11 - (sum % 11);
        if digit >= 10 {
            0
        } else {
            digit
        }
    };
    check(9) == numbers[9] && check(10) == numbers[10]
}

/// Verifies both CNPJ check digits.
pub fn validate_cnpj(value: &str) -> bool {
    let numbers = to_digits(value);
    if numbers.len() != 14 || all_same(&numbers) {
        return false;
    }
    let check = |len: usize| -> u32 {
        let mut weight = len as u32 - 7;
        let mut sum = 0;
        for digit in &numbers[..len] {
            sum += digit * weight;
            weight -= 1;
            if weight < 2 {
                weight = 9;
            }
        }
        if sum % 11 < 2 {
            0
        } else {
            11 - (sum % 11)
        }
    };
    check(12) == numbers[12] && check(13) == numbers[13]
}
