//! Deterministic auth method selection

use std::path::Path;

use super::method::{AppRoleAuth, AuthMethod, AuthResult, KubernetesAuth, TokenAuth};
use crate::env::{
    EnvProbe, K8S_SERVICE_ACCOUNT_TOKEN_PATH, VAULT_K8S_ROLE_ENV, VAULT_ROLE_ID_ENV,
    VAULT_SECRET_ID_ENV, VAULT_TOKEN_ENV,
};
use crate::types::ResolverOptions;

/// Select an auth method for the given options
///
/// Fixed priority, first match wins, no merging:
/// 1. Explicit `auth_method` on the options
/// 2. `VAULT_TOKEN` set → token auth
/// 3. `VAULT_ROLE_ID` and `VAULT_SECRET_ID` both set → AppRole auth
/// 4. `VAULT_K8S_ROLE` set and the service-account JWT file readable →
///    Kubernetes auth
/// 5. None found → [`super::AuthError::NoMethodResolvable`]
pub fn select_auth_method(options: &ResolverOptions, env: &dyn EnvProbe) -> AuthResult<AuthMethod> {
    if let Some(method) = &options.auth_method {
        return Ok(method.clone());
    }

    if let Some(token) = env.get(VAULT_TOKEN_ENV) {
        return Ok(AuthMethod::Token(TokenAuth::new(token)?));
    }

    if let (Some(role_id), Some(secret_id)) =
        (env.get(VAULT_ROLE_ID_ENV), env.get(VAULT_SECRET_ID_ENV))
    {
        return Ok(AuthMethod::AppRole(AppRoleAuth::new(role_id, secret_id)?));
    }

    if let Some(role) = env.get(VAULT_K8S_ROLE_ENV) {
        let jwt_path = Path::new(K8S_SERVICE_ACCOUNT_TOKEN_PATH);
        if env.file_readable(jwt_path) {
            return Ok(AuthMethod::Kubernetes(KubernetesAuth::new(
                role, jwt_path,
            )?));
        }
    }

    Err(super::AuthError::NoMethodResolvable(VAULT_TOKEN_ENV))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use crate::env::MemoryEnvProbe;

    #[test]
    fn test_explicit_method_wins() {
        let explicit = AuthMethod::Token(TokenAuth::new("explicit-token").unwrap());
        let options = ResolverOptions::new().with_auth_method(explicit.clone());
        // Environment also has a token; explicit still wins
        let env = MemoryEnvProbe::new().with_var(VAULT_TOKEN_ENV, "env-token");

        let selected = select_auth_method(&options, &env).unwrap();
        assert_eq!(selected, explicit);
    }

    #[test]
    fn test_env_token_beats_approle() {
        let env = MemoryEnvProbe::new()
            .with_var(VAULT_TOKEN_ENV, "env-token")
            .with_var(VAULT_ROLE_ID_ENV, "role")
            .with_var(VAULT_SECRET_ID_ENV, "secret");

        let selected = select_auth_method(&ResolverOptions::new(), &env).unwrap();
        assert!(matches!(selected, AuthMethod::Token(_)));
    }

    #[test]
    fn test_approle_requires_both_ids() {
        let env = MemoryEnvProbe::new().with_var(VAULT_ROLE_ID_ENV, "role");
        assert!(select_auth_method(&ResolverOptions::new(), &env).is_err());

        let env = MemoryEnvProbe::new()
            .with_var(VAULT_ROLE_ID_ENV, "role")
            .with_var(VAULT_SECRET_ID_ENV, "secret");
        let selected = select_auth_method(&ResolverOptions::new(), &env).unwrap();
        assert!(matches!(selected, AuthMethod::AppRole(_)));
    }

    #[test]
    fn test_kubernetes_requires_readable_identity_file() {
        let env = MemoryEnvProbe::new().with_var(VAULT_K8S_ROLE_ENV, "app");
        assert!(select_auth_method(&ResolverOptions::new(), &env).is_err());

        let env = MemoryEnvProbe::new()
            .with_var(VAULT_K8S_ROLE_ENV, "app")
            .with_readable_file(K8S_SERVICE_ACCOUNT_TOKEN_PATH);
        let selected = select_auth_method(&ResolverOptions::new(), &env).unwrap();
        match selected {
            AuthMethod::Kubernetes(k8s) => {
                assert_eq!(k8s.role(), "app");
                assert_eq!(
                    k8s.token_path(),
                    Path::new(K8S_SERVICE_ACCOUNT_TOKEN_PATH)
                );
            }
            other => panic!("expected kubernetes auth, got {other:?}"),
        }
    }

    #[test]
    fn test_nothing_resolvable_fails() {
        let env = MemoryEnvProbe::new();
        let err = select_auth_method(&ResolverOptions::new(), &env).unwrap_err();
        assert!(matches!(err, AuthError::NoMethodResolvable(_)));
    }
}
