/// Fixed institution prefix the login endpoint expects in front of every user.
const INSTITUTION_PREFIX: &str = "00230001";

/// Builds the user string sent to the login endpoint: the institution prefix,
/// the company code and the upper-cased user, in that order.
///
/// Nothing is validated here, a bad company code only shows up as a failed
/// login.
pub fn login_identifier(user: &str, company_code: &str) -> String {
    let mut id = String::with_capacity(INSTITUTION_PREFIX.len() + company_code.len() + user.len());
    id.push_str(INSTITUTION_PREFIX);
    id.push_str(company_code);
    id.push_str(&user.to_uppercase());
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_is_prefix_company_and_upper_user() {
        let tests = vec![
            ("jdoe", "0123", "002300010123JDOE"),
            ("MiXeD", "ACME", "00230001ACMEMIXED"),
            ("", "", "00230001"),
        ];

        for t in tests {
            assert_eq!(login_identifier(t.0, t.1), t.2);
        }
    }

    #[test]
    fn identifier_length_is_sum_of_parts() {
        let id = login_identifier("operator7", "998877");

        assert_eq!(id.len(), 8 + "998877".len() + "operator7".len());
        assert!(id.starts_with(INSTITUTION_PREFIX));
        assert_eq!(&id[8..14], "998877");
        assert_eq!(&id[14..], "OPERATOR7");
    }

    #[test]
    fn company_code_is_not_case_folded() {
        assert_eq!(login_identifier("a", "xy"), "00230001xyA");
    }
}
