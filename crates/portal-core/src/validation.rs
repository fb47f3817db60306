//! Input validators for login and first-access forms.
//!
//! Every validator is total: malformed input returns `false`, never panics.

/// Keep only ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn to_digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

/// Weighted sum where the weight starts at `start`, decreases by one per
/// digit and wraps back to 9 after reaching 2.
fn cnpj_weighted_sum(digits: &[u32], start: u32) -> u32 {
    let mut weight = start;
    let mut sum = 0;
    for d in digits {
        sum += d * weight;
        weight -= 1;
        if weight < 2 {
            weight = 9;
        }
    }
    sum
}

fn cnpj_check_digit(sum: u32) -> u32 {
    if sum % 11 < 2 { 0 } else { 11 - sum % 11 }
}

/// Validate a CNPJ (14 digits, two mod-11 check digits).
///
/// Punctuation is ignored, so both `11.222.333/0001-81` and `11222333000181`
/// are accepted.
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let digits = to_digits(cnpj);
    if digits.len() != 14 {
        return false;
    }
    if all_same(&digits) {
        return false;
    }

    let first = cnpj_check_digit(cnpj_weighted_sum(&digits[..12], 5));
    if first != digits[12] {
        return false;
    }

    let second = cnpj_check_digit(cnpj_weighted_sum(&digits[..13], 6));
    second == digits[13]
}

fn cpf_check_digit(digits: &[u32], start: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (start - i as u32))
        .sum();
    match 11 - sum % 11 {
        10 | 11 => 0,
        r => r,
    }
}

/// Validate a CPF (11 digits, weights 10→2 then 11→2).
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits = to_digits(cpf);
    if digits.len() != 11 {
        return false;
    }
    if all_same(&digits) {
        return false;
    }

    cpf_check_digit(&digits[..9], 10) == digits[9] && cpf_check_digit(&digits[..10], 11) == digits[10]
}

/// `local@domain.tld` with no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let last = domain.len().saturating_sub(1);
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last)
}

/// Minimum six characters.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 6
}

/// Landline (10 digits) or mobile (11 digits), punctuation ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let len = digits_only(phone).len();
    (10..=11).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Independent reference implementation of the CNPJ algorithm using the
    /// published weight tables.
    fn reference_cnpj(digits: &[u32]) -> bool {
        const W1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
        const W2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
        let dv = |sum: u32| if sum % 11 < 2 { 0 } else { 11 - sum % 11 };
        let s1: u32 = digits[..12].iter().zip(W1).map(|(d, w)| d * w).sum();
        let s2: u32 = digits[..13].iter().zip(W2).map(|(d, w)| d * w).sum();
        dv(s1) == digits[12] && dv(s2) == digits[13]
    }

    #[test]
    fn test_valid_cnpj() {
        assert!(is_valid_cnpj("11.222.333/0001-81"));
        assert!(is_valid_cnpj("11222333000181"));
        assert!(is_valid_cnpj("04.252.011/0001-10"));
    }

    #[test]
    fn test_invalid_cnpj() {
        assert!(!is_valid_cnpj("11.222.333/0001-82"));
        assert!(!is_valid_cnpj("1122233300018"));
        assert!(!is_valid_cnpj(""));
        assert!(!is_valid_cnpj("abc"));
    }

    #[test]
    fn test_cnpj_uniform_digits_rejected() {
        for d in 0..=9 {
            let cnpj = d.to_string().repeat(14);
            assert!(!is_valid_cnpj(&cnpj), "{cnpj} should be rejected");
        }
    }

    #[test]
    fn test_cnpj_matches_reference_algorithm() {
        // Walk a deterministic spread of bases and every check-digit pair.
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        for _ in 0..200 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let base = format!("{:012}", seed % 1_000_000_000_000);
            for check in 0..100 {
                let candidate = format!("{base}{check:02}");
                let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();
                let expected = !all_same(&digits) && reference_cnpj(&digits);
                assert_eq!(is_valid_cnpj(&candidate), expected, "{candidate}");
            }
        }
    }

    #[test]
    fn test_valid_cpf() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("52998224725"));
        assert!(is_valid_cpf("111.444.777-35"));
    }

    #[test]
    fn test_invalid_cpf() {
        assert!(!is_valid_cpf("529.982.247-26"));
        assert!(!is_valid_cpf("11111111111"));
        assert!(!is_valid_cpf("5299822472"));
        assert!(!is_valid_cpf(""));
    }

    #[test]
    fn test_cpf_remainder_ten_or_eleven_maps_to_zero() {
        // 11 - (sum % 11) == 11 for the first digit of this base.
        let base = [0u32, 1, 0, 0, 0, 0, 0, 0, 1];
        let sum: u32 = base.iter().enumerate().map(|(i, d)| d * (10 - i as u32)).sum();
        assert_eq!(sum % 11, 0);
        assert_eq!(cpf_check_digit(&base, 10), 0);
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("cliente@empresa.com.br"));
        assert!(!is_valid_email("cliente@empresa"));
        assert!(!is_valid_email("cliente empresa@x.com"));
        assert!(!is_valid_email("@empresa.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_and_password() {
        assert!(is_valid_phone("(14) 3333-4444"));
        assert!(is_valid_phone("(14) 99778-2644"));
        assert!(!is_valid_phone("3333-4444"));
        assert!(is_valid_password("123456"));
        assert!(!is_valid_password("12345"));
    }
}
