use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    // 998 country prefix (optional +) or the domestic leading 8, then operator code, then 7 digits.
    static ref PHONE_RE: Regex = Regex::new(
        r"^\+?998(90|91|93|94|97|88|98|33|71)[0-9]{7}$|^8(90|91|93|94|97|88|98|33|71)[0-9]{7}$"
    )
    .unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_phone_number(phone_number: &str) -> bool {
    PHONE_RE.is_match(phone_number)
}
