use super::*;

#[test]
fn sign_in_trims_email_and_keeps_password() {
    assert_eq!(
        validate_login(LoginMode::SignIn, "  ana@example.com ", " secret ", ""),
        Ok(LoginRequest::SignIn { email: "ana@example.com".to_owned(), password: " secret ".to_owned() })
    );
}

#[test]
fn email_is_required() {
    assert_eq!(validate_login(LoginMode::SignIn, "   ", "secret", ""), Err("Informe o email."));
}

#[test]
fn malformed_email_is_rejected() {
    assert_eq!(validate_login(LoginMode::Reset, "ana", "", ""), Err("Email inválido."));
    assert_eq!(validate_login(LoginMode::Reset, "@example.com", "", ""), Err("Email inválido."));
    assert_eq!(validate_login(LoginMode::Reset, "ana@localhost", "", ""), Err("Email inválido."));
}

#[test]
fn short_password_is_rejected() {
    assert_eq!(
        validate_login(LoginMode::SignIn, "ana@example.com", "12345", ""),
        Err("A senha deve ter pelo menos 6 caracteres.")
    );
    assert_eq!(validate_login(LoginMode::SignUp, "ana@example.com", "", ""), Err("Informe a senha."));
}

#[test]
fn reset_ignores_password() {
    assert_eq!(
        validate_login(LoginMode::Reset, "ana@example.com", "", ""),
        Ok(LoginRequest::Reset { email: "ana@example.com".to_owned() })
    );
}

#[test]
fn sign_up_full_name_is_optional() {
    assert_eq!(
        validate_login(LoginMode::SignUp, "ana@example.com", "secret", "  "),
        Ok(LoginRequest::SignUp {
            email: "ana@example.com".to_owned(),
            password: "secret".to_owned(),
            full_name: None,
        })
    );
    assert_eq!(
        validate_login(LoginMode::SignUp, "ana@example.com", "secret", " Ana Lima "),
        Ok(LoginRequest::SignUp {
            email: "ana@example.com".to_owned(),
            password: "secret".to_owned(),
            full_name: Some("Ana Lima".to_owned()),
        })
    );
}
