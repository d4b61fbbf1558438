//! 消息目录
//!
//! 消息类型与状态码的双向查找表。正向查找是编译期 `match`，反向查找表在
//! 第一次使用（或 [`init`]）时构建一次，此后只读。

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Serialize, Serializer};

/// 响应位
pub const RESPONSE_BIT: u32 = 0x8000_0000;

macro_rules! message_types {
    ($($variant:ident = $id:literal => $name:literal,)*) => {
        /// PDU 类型
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum MessageType {
            $($variant,)*
        }

        impl MessageType {
            /// 全部类型，按协议 id 声明顺序
            pub const ALL: &'static [MessageType] = &[$(MessageType::$variant,)*];

            /// 协议 command_id
            pub fn id(self) -> u32 {
                match self {
                    $(MessageType::$variant => $id,)*
                }
            }

            /// 脚本与日志中使用的名称
            pub fn name(self) -> &'static str {
                match self {
                    $(MessageType::$variant => $name,)*
                }
            }
        }
    };
}

message_types! {
    GenericNack = 0x8000_0000 => "GENERIC_NACK",
    BindReceiver = 0x0000_0001 => "BIND_RECEIVER",
    BindReceiverResp = 0x8000_0001 => "BIND_RECEIVER_RESP",
    BindTransmitter = 0x0000_0002 => "BIND_TRANSMITTER",
    BindTransmitterResp = 0x8000_0002 => "BIND_TRANSMITTER_RESP",
    QuerySm = 0x0000_0003 => "QUERY_SM",
    QuerySmResp = 0x8000_0003 => "QUERY_SM_RESP",
    SubmitSm = 0x0000_0004 => "SUBMIT_SM",
    SubmitSmResp = 0x8000_0004 => "SUBMIT_SM_RESP",
    DeliverSm = 0x0000_0005 => "DELIVER_SM",
    DeliverSmResp = 0x8000_0005 => "DELIVER_SM_RESP",
    Unbind = 0x0000_0006 => "UNBIND",
    UnbindResp = 0x8000_0006 => "UNBIND_RESP",
    ReplaceSm = 0x0000_0007 => "REPLACE_SM",
    ReplaceSmResp = 0x8000_0007 => "REPLACE_SM_RESP",
    CancelSm = 0x0000_0008 => "CANCEL_SM",
    CancelSmResp = 0x8000_0008 => "CANCEL_SM_RESP",
    BindTransceiver = 0x0000_0009 => "BIND_TRANSCEIVER",
    BindTransceiverResp = 0x8000_0009 => "BIND_TRANSCEIVER_RESP",
    Outbind = 0x0000_000B => "OUTBIND",
    EnquireLink = 0x0000_0015 => "ENQUIRE_LINK",
    EnquireLinkResp = 0x8000_0015 => "ENQUIRE_LINK_RESP",
    SubmitMulti = 0x0000_0021 => "SUBMIT_MULTI",
    SubmitMultiResp = 0x8000_0021 => "SUBMIT_MULTI_RESP",
    AlertNotification = 0x0000_0102 => "ALERT_NOTIFICATION",
    DataSm = 0x0000_0103 => "DATA_SM",
    DataSmResp = 0x8000_0103 => "DATA_SM_RESP",
}

impl MessageType {
    /// 按 command_id 查找；未知 id 返回 `None`
    pub fn from_id(id: u32) -> Option<MessageType> {
        tables().types_by_id.get(&id).copied()
    }

    /// 按名称查找（不区分大小写）
    pub fn from_name(name: &str) -> Option<MessageType> {
        tables()
            .types_by_name
            .get(name.trim().to_ascii_uppercase().as_str())
            .copied()
    }

    /// 是否为响应
    pub fn is_response(self) -> bool {
        self.id() & RESPONSE_BIT != 0
    }

    /// 请求对应的响应类型
    pub fn response_type(self) -> Option<MessageType> {
        if self.is_response() {
            return None;
        }
        MessageType::from_id(self.id() | RESPONSE_BIT)
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageType::from_name(s).ok_or_else(|| format!("未知的消息类型: {}", s))
    }
}

impl Serialize for MessageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

macro_rules! status_codes {
    ($($variant:ident = $code:literal => $name:literal,)*) => {
        /// 命令状态码
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum StatusCode {
            $($variant,)*
        }

        impl StatusCode {
            /// 全部已定义状态码
            pub const ALL: &'static [StatusCode] = &[$(StatusCode::$variant,)*];

            /// 数值
            pub fn code(self) -> u32 {
                match self {
                    $(StatusCode::$variant => $code,)*
                }
            }

            /// 符号名
            pub fn name(self) -> &'static str {
                match self {
                    $(StatusCode::$variant => $name,)*
                }
            }
        }
    };
}

status_codes! {
    Ok = 0x00 => "ESME_ROK",
    InvalidMsgLen = 0x01 => "ESME_RINVMSGLEN",
    InvalidCmdLen = 0x02 => "ESME_RINVCMDLEN",
    InvalidCmdId = 0x03 => "ESME_RINVCMDID",
    InvalidBindStatus = 0x04 => "ESME_RINVBNDSTS",
    AlreadyBound = 0x05 => "ESME_RALYBND",
    InvalidPriorityFlag = 0x06 => "ESME_RINVPRTFLG",
    InvalidRegisteredDeliveryFlag = 0x07 => "ESME_RINVREGDLVFLG",
    SystemError = 0x08 => "ESME_RSYSERR",
    InvalidSourceAddr = 0x0A => "ESME_RINVSRCADR",
    InvalidDestAddr = 0x0B => "ESME_RINVDSTADR",
    InvalidMessageId = 0x0C => "ESME_RINVMSGID",
    BindFailed = 0x0D => "ESME_RBINDFAIL",
    InvalidPassword = 0x0E => "ESME_RINVPASWD",
    InvalidSystemId = 0x0F => "ESME_RINVSYSID",
    CancelFailed = 0x11 => "ESME_RCANCELFAIL",
    ReplaceFailed = 0x13 => "ESME_RREPLACEFAIL",
    MessageQueueFull = 0x14 => "ESME_RMSGQFUL",
    InvalidServiceType = 0x15 => "ESME_RINVSERTYP",
    AddCustomerFailed = 0x19 => "ESME_RADDCUSTFAIL",
    DeleteCustomerFailed = 0x1A => "ESME_RDELCUSTFAIL",
    ModifyCustomerFailed = 0x1B => "ESME_RMODCUSTFAIL",
    EnquireCustomerFailed = 0x1C => "ESME_RENQCUSTFAIL",
    InvalidCustomerId = 0x1D => "ESME_RINVCUSTID",
    InvalidCustomerName = 0x1F => "ESME_RINVCUSTNAME",
    InvalidCustomerAddr = 0x21 => "ESME_RINVCUSTADR",
    InvalidAddr = 0x22 => "ESME_RINVADR",
    CustomerExists = 0x23 => "ESME_RCUSTEXIST",
    CustomerNotExists = 0x24 => "ESME_RCUSTNOTEXIST",
    AddDistributionListFailed = 0x26 => "ESME_RADDDLFAIL",
    ModifyDistributionListFailed = 0x27 => "ESME_RMODDLFAIL",
    DeleteDistributionListFailed = 0x28 => "ESME_RDELDLFAIL",
    ViewDistributionListFailed = 0x29 => "ESME_RVIEWDLFAIL",
    ListDistributionListsFailed = 0x30 => "ESME_RLISTDLSFAIL",
    ParamRetrieveFailed = 0x31 => "ESME_RPARAMRETFAIL",
    InvalidParam = 0x32 => "ESME_RINVPARAM",
    InvalidNumberOfDests = 0x33 => "ESME_RINVNUMDESTS",
    InvalidDistributionListName = 0x34 => "ESME_RINVDLNAME",
    InvalidDistributionListMemberDesc = 0x35 => "ESME_RINVDLMEMBDESC",
    InvalidDistributionListMemberType = 0x38 => "ESME_RINVDLMEMBTYP",
    InvalidDistributionListModifyOption = 0x39 => "ESME_RINVDLMODOPT",
    InvalidDestFlag = 0x40 => "ESME_RINVDESTFLAG",
    InvalidSubmitWithReplace = 0x42 => "ESME_RINVSUBREP",
    InvalidEsmClass = 0x43 => "ESME_RINVESMCLASS",
    CannotSubmitToDistributionList = 0x44 => "ESME_RCNTSUBDL",
    SubmitFailed = 0x45 => "ESME_RSUBMITFAIL",
    InvalidSourceTon = 0x48 => "ESME_RINVSRCTON",
    InvalidSourceNpi = 0x49 => "ESME_RINVSRCNPI",
    InvalidDestTon = 0x50 => "ESME_RINVDSTTON",
    InvalidDestNpi = 0x51 => "ESME_RINVDSTNPI",
    InvalidSystemType = 0x53 => "ESME_RINVSYSTYP",
    InvalidReplaceFlag = 0x54 => "ESME_RINVREPFLAG",
    InvalidNumberOfMessages = 0x55 => "ESME_RINVNUMMSGS",
    Throttled = 0x58 => "ESME_RTHROTTLED",
    ProvisioningNotAllowed = 0x59 => "ESME_RPROVNOTALLWD",
    InvalidScheduledDeliveryTime = 0x61 => "ESME_RINVSCHED",
    InvalidExpiry = 0x62 => "ESME_RINVEXPIRY",
    InvalidDefaultMsgId = 0x63 => "ESME_RINVDFTMSGID",
    TempAppError = 0x64 => "ESME_RX_T_APPN",
    PermAppError = 0x65 => "ESME_RX_P_APPN",
    RejectAppError = 0x66 => "ESME_RX_R_APPN",
    QueryFailed = 0x67 => "ESME_RQUERYFAIL",
    InvalidPagingCustomerId = 0x80 => "ESME_RINVPGCUSTID",
    InvalidPagingCustomerIdLen = 0x81 => "ESME_RINVPGCUSTIDLEN",
    InvalidCityLen = 0x82 => "ESME_RINVCITYLEN",
    InvalidStateLen = 0x83 => "ESME_RINVSTATELEN",
    InvalidZipPrefixLen = 0x84 => "ESME_RINVZIPPREFIXLEN",
    InvalidZipPostfixLen = 0x85 => "ESME_RINVZIPPOSTFIXLEN",
    InvalidMinLen = 0x86 => "ESME_RINVMINLEN",
    InvalidMin = 0x87 => "ESME_RINVMIN",
    InvalidPinLen = 0x88 => "ESME_RINVPINLEN",
    InvalidTerminalCodeLen = 0x89 => "ESME_RINVTERMCODELEN",
    InvalidChannelLen = 0x8A => "ESME_RINVCHANNELLEN",
    InvalidCoverageRegionLen = 0x8B => "ESME_RINVCOVREGIONLEN",
    InvalidCapCodeLen = 0x8C => "ESME_RINVCAPCODELEN",
    InvalidMessageDeliveryTimeLen = 0x8D => "ESME_RINVMDTLEN",
    InvalidPriorityMessageLen = 0x8E => "ESME_RINVPRIORMSGLEN",
    InvalidPeriodicMessageLen = 0x8F => "ESME_RINVPERMSGLEN",
    InvalidPagingAlertLen = 0x90 => "ESME_RINVPGALERTLEN",
    InvalidSmUserLen = 0x91 => "ESME_RINVSMUSERLEN",
    InvalidRtdbLen = 0x92 => "ESME_RINVRTDBLEN",
    InvalidRegisteredDeliveryLen = 0x93 => "ESME_RINVREGDELLEN",
    InvalidMessageDistributionLen = 0x94 => "ESME_RINVMSGDISTLEN",
    InvalidPriorityMessage = 0x95 => "ESME_RINVPRIORMSG",
    InvalidMessageDeliveryTime = 0x96 => "ESME_RINVMDT",
    InvalidPeriodicMessage = 0x97 => "ESME_RINVPERMSG",
    InvalidMessageDistribution = 0x98 => "ESME_RINVMSGDIST",
    InvalidPagingAlert = 0x99 => "ESME_RINVPGALERT",
    InvalidSmUser = 0x9A => "ESME_RINVSMUSER",
    InvalidRtdb = 0x9B => "ESME_RINVRTDB",
    InvalidRegisteredDelivery = 0x9C => "ESME_RINVREGDEL",
    InvalidOptionalParamStream = 0x9D => "ESME_RINVOPTPARSTREAM",
    OptionalParamNotAllowed = 0x9E => "ESME_ROPTPARNOTALLWD",
    InvalidOptionalParamLen = 0x9F => "ESME_RINVOPTPARLEN",
    MissingOptionalParam = 0xC3 => "ESME_RMISSINGOPTPARAM",
    InvalidOptionalParamValue = 0xC4 => "ESME_RINVOPTPARAMVAL",
    DeliveryFailure = 0xFE => "ESME_RDELIVERYFAILURE",
    UnknownError = 0xFF => "ESME_RUNKNOWNERR",
}

impl StatusCode {
    /// 按数值查找；未知状态码返回 `None`
    pub fn from_code(code: u32) -> Option<StatusCode> {
        tables().statuses_by_code.get(&code).copied()
    }

    /// 按符号名查找（不区分大小写）
    pub fn from_name(name: &str) -> Option<StatusCode> {
        tables()
            .statuses_by_name
            .get(name.trim().to_ascii_uppercase().as_str())
            .copied()
    }

    pub fn is_ok(self) -> bool {
        self == StatusCode::Ok
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

struct Tables {
    types_by_id: HashMap<u32, MessageType>,
    types_by_name: HashMap<&'static str, MessageType>,
    statuses_by_code: HashMap<u32, StatusCode>,
    statuses_by_name: HashMap<&'static str, StatusCode>,
}

static TABLES: OnceLock<Tables> = OnceLock::new();

fn tables() -> &'static Tables {
    TABLES.get_or_init(|| Tables {
        types_by_id: MessageType::ALL.iter().map(|t| (t.id(), *t)).collect(),
        types_by_name: MessageType::ALL.iter().map(|t| (t.name(), *t)).collect(),
        statuses_by_code: StatusCode::ALL.iter().map(|s| (s.code(), *s)).collect(),
        statuses_by_name: StatusCode::ALL.iter().map(|s| (s.name(), *s)).collect(),
    })
}

/// 构建反向查找表；在执行任何批处理之前调用
pub fn init() {
    let tables = tables();
    tracing::debug!(
        "消息目录已初始化: {} 种消息类型, {} 个状态码",
        tables.types_by_id.len(),
        tables.statuses_by_code.len()
    );
}

/// command_id 的显示形式：已知则为名称，否则为十六进制数值
pub fn type_label(id: u32) -> String {
    match MessageType::from_id(id) {
        Some(t) => t.name().to_string(),
        None => format!("0x{:08X}", id),
    }
}

/// command_status 的显示形式：已知则为符号名，否则为十进制数值
pub fn status_label(code: u32) -> String {
    match StatusCode::from_code(code) {
        Some(s) => s.name().to_string(),
        None => code.to_string(),
    }
}
