use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::client::HttpClient;
use crate::mapper::{decode, to_account, RawAccount, Records};
use crate::model::Account;
use crate::session::Session;
use crate::{Error, Result};

const ACCOUNTS_ENDPOINT: &str =
    "/SESKYOS/kyos_mult_web_servicios_02/services/rest/CuentasServiceREST/getDatosCuentas";

#[derive(Debug, Serialize)]
struct AccountsRequest {
    #[serde(rename = "peticionCuentasKYOSPaginadas")]
    query: AccountsQuery,
}

#[derive(Debug, Serialize)]
struct AccountsQuery {
    favoritos: bool,
    paginacion: &'static str,
}

#[derive(Debug, Deserialize)]
struct AccountsEnvelope {
    respuestacuentas: Option<AccountsPayload>,
}

#[derive(Debug, Deserialize)]
struct AccountsPayload {
    cuentas: Option<Value>,
}

/// Lists every account of the session's user. The whole list is assumed to
/// fit on the first page.
#[tracing::instrument(skip(session))]
pub(crate) async fn fetch<C: HttpClient>(session: &Session<C>) -> Result<Vec<Account>> {
    let request = AccountsRequest {
        query: AccountsQuery {
            favoritos: false,
            paginacion: "0",
        },
    };

    let raw = session.post_json(ACCOUNTS_ENDPOINT, &request).await?;
    let accounts = parse(&raw)?;
    info!("fetched {} accounts", accounts.len());

    Ok(accounts)
}

fn parse(raw: &str) -> Result<Vec<Account>> {
    let envelope: AccountsEnvelope =
        serde_json::from_str(raw).map_err(|e| Error::Shape(format!("accounts envelope: {}", e)))?;
    let payload = envelope
        .respuestacuentas
        .ok_or_else(|| Error::Shape("missing field \"respuestacuentas\"".into()))?;

    match Records::from_field("cuentas", payload.cuentas)? {
        Records::Many(items) => items
            .into_iter()
            .map(|item| to_account(decode::<RawAccount>(item)?))
            .collect(),
        Records::One(item) => Ok(vec![to_account(decode::<RawAccount>(item)?)?]),
        Records::Absent => Err(Error::Shape("missing field \"cuentas\"".into())),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::AccountId;
    use crate::testing::{credentials, ScriptedClient};

    fn account_json(reference: &str, iban: &str) -> Value {
        json!({
            "referencia": reference,
            "empresaDes": "ACME SL",
            "saldoValor": "10.00",
            "saldoContable": "10.00",
            "divisa": "EUR",
            "numeroAsunto": iban,
            "bancoDes": "BBVA",
            "numeroAsuntoMostrar": "**** 0001"
        })
    }

    #[test]
    fn single_object_is_one_account() {
        let body = json!({"respuestacuentas": {"cuentas": account_json("R1", "ES01")}});

        let accounts = parse(&body.to_string()).unwrap();

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, AccountId("R1".into()));
        assert_eq!(accounts[0].iban, "ES01");
    }

    #[test]
    fn list_keeps_source_order() {
        let body = json!({"respuestacuentas": {"cuentas": [
            account_json("R1", "ES01"),
            account_json("R2", "ES02"),
            account_json("R3", "ES03"),
        ]}});

        let ids: Vec<String> = parse(&body.to_string())
            .unwrap()
            .into_iter()
            .map(|a| a.id.0)
            .collect();

        assert_eq!(ids, vec!["R1", "R2", "R3"]);
    }

    #[test]
    fn missing_or_malformed_accounts_are_fatal() {
        let tests = vec![
            json!({}),
            json!({"respuestacuentas": {}}),
            json!({"respuestacuentas": {"cuentas": null}}),
            json!({"respuestacuentas": {"cuentas": "none"}}),
        ];

        for t in tests {
            assert!(matches!(parse(&t.to_string()), Err(Error::Shape(_))), "{}", t);
        }
        assert!(matches!(parse("<html>"), Err(Error::Shape(_))));
    }

    #[tokio::test]
    async fn fetch_posts_first_page_of_non_favourites() {
        let body = json!({"respuestacuentas": {"cuentas": [account_json("R1", "ES01")]}});
        let client = ScriptedClient::default().respond("").respond(body.to_string());
        let session = Session::login(client.clone(), "http://bank.test", &credentials())
            .await
            .unwrap();

        let accounts = fetch(&session).await.unwrap();
        assert_eq!(accounts.len(), 1);

        let req = &client.requests()[1];
        assert!(req.url.ends_with("/CuentasServiceREST/getDatosCuentas"));
        assert_eq!(
            req.json(),
            json!({"peticionCuentasKYOSPaginadas": {"favoritos": false, "paginacion": "0"}})
        );
        assert!(req.headers.get("Contexto").is_some());
    }
}
