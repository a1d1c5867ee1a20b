use serde::Serialize;

/// Session descriptor the API requires in the `Contexto` header of every call
/// made after login. Apart from the user every value is fixed by the mobile
/// app; identity fields the bank fills server side are sent empty.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Context<'a> {
    perfil: Profile<'a>,
    puesto: Post,
    transacciones: Channel,
    datos_tecnicos: TechnicalData<'a>,
    codigo_cliente: &'static str,
    tipo_autenticacion: &'static str,
    identificacion_cliente: &'static str,
    tipo_identificacion_cliente: &'static str,
    propiedades: Option<()>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Profile<'a> {
    usuario: &'a str,
    nombre: &'static str,
    apellido1: &'static str,
    apellido2: &'static str,
    dni: &'static str,
    cargo_fun: &'static str,
    centro_coste: &'static str,
    matricula: &'static str,
    banco_operativo: &'static str,
    oficina_operativa: &'static str,
    banco_fisico: &'static str,
    oficina_fisica: &'static str,
    pais_oficina: &'static str,
    idioma: &'static str,
    idioma_iso: &'static str,
    divisa_base: &'static str,
    divisa_secundaria: &'static str,
    xti_ofi_fisica: &'static str,
    xti_ofi_operati: &'static str,
    lista_autorizaciones: [&'static str; 2],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Post {
    puesto_logico: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Channel {
    canal_llamante: &'static str,
    medio_acceso: &'static str,
    secuencia: Option<&'static str>,
    servicio_producto: &'static str,
    tipo_identificacion_cliente: &'static str,
    identificacion_cliente: &'static str,
    modo_proceso: Option<&'static str>,
    autorizacion: Option<&'static str>,
    origen_fisico: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TechnicalData<'a> {
    id_peticion: Option<&'static str>,
    #[serde(rename = "UUAARemitente")]
    uuaa_remitente: Option<&'static str>,
    usuario_logico: &'static str,
    cabeceras_http: EchoedHeaders<'a>,
}

#[derive(Debug, Serialize)]
struct EchoedHeaders<'a> {
    aap: &'static str,
    #[serde(rename = "iv-user")]
    iv_user: &'a str,
}

const CLIENT_ID_TYPE: &str = "6";

impl<'a> Context<'a> {
    pub fn new(user: &'a str) -> Self {
        Self {
            perfil: Profile {
                usuario: user,
                nombre: "",
                apellido1: "",
                apellido2: "",
                dni: "",
                cargo_fun: "",
                centro_coste: "",
                matricula: "",
                banco_operativo: "",
                oficina_operativa: "",
                banco_fisico: "",
                oficina_fisica: "",
                pais_oficina: "",
                idioma: "1",
                idioma_iso: "1",
                divisa_base: "ZZZ",
                divisa_secundaria: "",
                xti_ofi_fisica: "",
                xti_ofi_operati: "",
                lista_autorizaciones: ["AAAA", "BBBB"],
            },
            puesto: Post { puesto_logico: "3" },
            transacciones: Channel {
                canal_llamante: "4",
                medio_acceso: "7",
                secuencia: None,
                servicio_producto: "27",
                tipo_identificacion_cliente: CLIENT_ID_TYPE,
                identificacion_cliente: "",
                modo_proceso: None,
                autorizacion: None,
                origen_fisico: None,
            },
            datos_tecnicos: TechnicalData {
                id_peticion: None,
                uuaa_remitente: None,
                usuario_logico: "",
                cabeceras_http: EchoedHeaders {
                    aap: "00000034",
                    iv_user: user,
                },
            },
            codigo_cliente: "1",
            tipo_autenticacion: "1",
            identificacion_cliente: "",
            tipo_identificacion_cliente: CLIENT_ID_TYPE,
            propiedades: None,
        }
    }

    /// Header value form of the context.
    pub fn to_header(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
