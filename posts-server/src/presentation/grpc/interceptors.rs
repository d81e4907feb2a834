use tonic::metadata::MetadataMap;
use tonic::{Code, Status};

use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct GrpcAuthContext {
    pub(crate) email: String,
}

pub(crate) fn authenticate_admin(
    jwt: &JwtService,
    metadata: &MetadataMap,
) -> Result<GrpcAuthContext, Status> {
    let token = parse_bearer_token(metadata)?;
    let claims = jwt
        .verify_token(token)
        .map_err(|_| Status::new(Code::Unauthenticated, "invalid token"))?;

    if !claims.is_admin() {
        return Err(Status::permission_denied("admin role required"));
    }

    Ok(GrpcAuthContext {
        email: claims.email,
    })
}

fn parse_bearer_token(metadata: &MetadataMap) -> Result<&str, Status> {
    let invalid = || Status::new(Code::Unauthenticated, "invalid authorization metadata");

    let raw = metadata
        .get("authorization")
        .ok_or_else(|| Status::new(Code::Unauthenticated, "missing authorization metadata"))?
        .to_str()
        .map_err(|_| invalid())?;

    let mut parts = raw.split_whitespace();
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(invalid());
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use tonic::Code;
    use tonic::metadata::MetadataMap;

    use super::authenticate_admin;
    use crate::infrastructure::jwt::JwtService;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn metadata(value: &str) -> MetadataMap {
        let mut metadata = MetadataMap::new();
        metadata.insert("authorization", value.parse().expect("ascii metadata"));
        metadata
    }

    #[test]
    fn admin_token_is_accepted() {
        let jwt = JwtService::new(SECRET);
        let token = jwt.generate_token("mod@example.com", "admin", 60).expect("token");

        let auth = authenticate_admin(&jwt, &metadata(&format!("Bearer {token}")))
            .expect("admin must pass");
        assert_eq!(auth.email, "mod@example.com");
    }

    #[test]
    fn user_token_is_denied() {
        let jwt = JwtService::new(SECRET);
        let token = jwt.generate_token("a@example.com", "user", 60).expect("token");

        let status = authenticate_admin(&jwt, &metadata(&format!("Bearer {token}")))
            .expect_err("user must be denied");
        assert_eq!(status.code(), Code::PermissionDenied);
    }

    #[test]
    fn missing_or_malformed_header_is_unauthenticated() {
        let jwt = JwtService::new(SECRET);

        let status = authenticate_admin(&jwt, &MetadataMap::new()).expect_err("missing");
        assert_eq!(status.code(), Code::Unauthenticated);

        let status = authenticate_admin(&jwt, &metadata("Basic abc")).expect_err("scheme");
        assert_eq!(status.code(), Code::Unauthenticated);
    }
}
