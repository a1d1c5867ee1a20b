//! Paged retrieval of an account's movements.
//!
//! Each page answers with three opaque pagination tokens which must be sent
//! back untouched to get the next page. The bank says more pages exist by
//! setting the response description to [`MORE_RECORDS`]; any other
//! description ends the history.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::client::HttpClient;
use crate::mapper::{decode, to_transaction, RawTransaction, Records};
use crate::model::{Account, AccountId, DateRange, Transaction};
use crate::session::Session;
use crate::{Error, Result};

const TRANSACTIONS_ENDPOINT: &str =
    "/SESKYOS/kyos_mult_web_servicios_02/services/rest/CuentasServiceREST/getMovimientos";
const MORE_RECORDS: &str = "More records available";
const BANK_NAME: &str = "BANCO BILBAO VIZCAYA ARGENTARIA S.A";
const COMPACT_DATE: &str = "%Y%m%d";
const ISO_DATE: &str = "%Y-%m-%d";

/// Pagination tokens echoed between pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cursor {
    #[serde(rename = "paginacionMOVDIA")]
    pub movdia: Value,
    #[serde(rename = "paginacionTLSMT016")]
    pub tlsmt016: Value,
    #[serde(rename = "paginacionTLSMT017")]
    pub tlsmt017: Value,
}

impl Default for Cursor {
    /// Start of history.
    fn default() -> Self {
        Self {
            movdia: Value::from("1"),
            tlsmt016: Value::from("N00000000000+0000000000000000"),
            tlsmt017: Value::from("N000000000000+0000000000000000000"),
        }
    }
}

impl Cursor {
    fn is_complete(&self) -> bool {
        !(self.movdia.is_null() || self.tlsmt016.is_null() || self.tlsmt017.is_null())
    }
}

#[derive(Debug, Serialize)]
struct MovementsRequest<'a> {
    #[serde(rename = "peticionMovimientosKYOS")]
    query: MovementsQuery<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MovementsQuery<'a> {
    num_asunto: &'a str,
    banco_asunto: &'static str,
    fecha_desde: String,
    fecha_hasta: String,
    concepto: [&'static str; 0],
    #[serde(rename = "importe_Desde")]
    importe_desde: &'static str,
    #[serde(rename = "importe_Hasta")]
    importe_hasta: &'static str,
    divisa: &'static str,
    #[serde(flatten)]
    cursor: &'a Cursor,
    descarga_informes: bool,
    num_elem: u32,
    banco: &'static str,
    idioma: &'static str,
    formato_fecha: &'static str,
    ultima_fecha_paginacion_anterior: &'static str,
    ordenacion: &'static str,
}

#[derive(Debug, Deserialize)]
struct MovementsEnvelope {
    respuestamovimientos: Option<MovementsPage>,
}

#[derive(Debug, Deserialize)]
struct MovementsPage {
    movimientos: Option<Value>,
    descripcion: Option<String>,
    #[serde(rename = "paginacionMOVDIA", default)]
    movdia: Value,
    #[serde(rename = "paginacionTLSMT016", default)]
    tlsmt016: Value,
    #[serde(rename = "paginacionTLSMT017", default)]
    tlsmt017: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Requesting,
    Done,
}

/// Walks the movement history of one account, one request per page.
pub struct Pages<'s, C: HttpClient> {
    session: &'s Session<C>,
    account: AccountId,
    iban: String,
    range: DateRange,
    cursor: Cursor,
    state: State,
}

impl<'s, C: HttpClient> Pages<'s, C> {
    pub fn new(session: &'s Session<C>, account: &Account, range: DateRange) -> Self {
        Self {
            session,
            account: account.id.clone(),
            iban: account.iban.clone(),
            range,
            cursor: Cursor::default(),
            state: State::Requesting,
        }
    }

    /// The cursor the next request will send.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Fetches the next page. Returns `None` once the history is exhausted.
    #[tracing::instrument(
        skip(self),
        fields(
            account = %self.account,
            from = %self.range.start().format(ISO_DATE),
            to = %self.range.end().format(ISO_DATE)
        )
    )]
    pub async fn next_page(&mut self) -> Result<Option<Vec<Transaction>>> {
        if self.state == State::Done {
            return Ok(None);
        }

        let request = MovementsRequest {
            query: MovementsQuery {
                num_asunto: &self.iban,
                banco_asunto: BANK_NAME,
                fecha_desde: self.range.start().format(COMPACT_DATE).to_string(),
                fecha_hasta: self.range.end().format(COMPACT_DATE).to_string(),
                concepto: [],
                importe_desde: "",
                importe_hasta: "",
                divisa: "EUR",
                cursor: &self.cursor,
                descarga_informes: false,
                num_elem: 0,
                banco: "1",
                idioma: "51",
                formato_fecha: "dd/MM/yyyy",
                ultima_fecha_paginacion_anterior: "",
                ordenacion: "DESC",
            },
        };

        let raw = self.session.post_json(TRANSACTIONS_ENDPOINT, &request).await?;
        let page = parse_page(&raw)?;

        let txns = match Records::from_field("movimientos", page.movimientos)? {
            Records::Many(items) => {
                let txns = items
                    .into_iter()
                    .map(|item| to_transaction(decode::<RawTransaction>(item)?, &self.account))
                    .collect::<Result<Vec<_>>>()?;

                // Replaced even for an empty page so the bank's position is never lost.
                self.cursor = Cursor {
                    movdia: page.movdia,
                    tlsmt016: page.tlsmt016,
                    tlsmt017: page.tlsmt017,
                };

                if page.descripcion.as_deref() == Some(MORE_RECORDS) {
                    if !self.cursor.is_complete() {
                        return Err(Error::Shape(
                            "more records announced without pagination tokens".into(),
                        ));
                    }
                } else {
                    self.state = State::Done;
                }

                txns
            }
            Records::One(item) => {
                self.state = State::Done;
                vec![to_transaction(decode::<RawTransaction>(item)?, &self.account)?]
            }
            Records::Absent => {
                self.state = State::Done;
                vec![]
            }
        };

        debug!(count = txns.len(), done = self.is_done(), "fetched page");
        Ok(Some(txns))
    }

    /// Drives the pagination to the end and returns every movement in the
    /// order the bank sent them. A failure on any page discards the rest.
    pub async fn collect(mut self) -> Result<Vec<Transaction>> {
        let mut all = vec![];
        let mut pages = 0;
        while let Some(mut page) = self.next_page().await? {
            pages += 1;
            all.append(&mut page);
        }

        info!("fetched {} transactions in {} pages", all.len(), pages);
        Ok(all)
    }
}

fn parse_page(raw: &str) -> Result<MovementsPage> {
    let envelope: MovementsEnvelope = serde_json::from_str(raw)
        .map_err(|e| Error::Shape(format!("movements envelope: {}", e)))?;

    envelope
        .respuestamovimientos
        .ok_or_else(|| Error::Shape("missing field \"respuestamovimientos\"".into()))
}
